use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Weekly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(Self::Monthly),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetFields {
    pub category: Category,
    pub limit: Decimal,
    pub period: BudgetPeriod,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(rename = "_id")]
    pub budget_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub category: Category,
    pub limit: Decimal,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(user_id: Uuid, fields: BudgetFields, now: DateTime<Utc>) -> Self {
        Self {
            budget_id: Uuid::new_v4(),
            user_id,
            category: fields.category,
            limit: fields.limit,
            period: fields.period,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: BudgetFields, now: DateTime<Utc>) {
        self.category = fields.category;
        self.limit = fields.limit;
        self.period = fields.period;
        self.updated_at = now;
    }
}
