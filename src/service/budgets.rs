use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};
use uuid::Uuid;

use crate::analytics::budgets::{budget_analytics, BudgetAnalytics, BudgetProgress, BudgetWithProgress};
use crate::analytics::checked_total;
use crate::analytics::period::PeriodAnchor;
use crate::database::db::queries::budgets as queries;
use crate::database::db::queries::transactions::expense_amounts;
use crate::database::models::{Budget, BudgetFields, BudgetPeriod, Category};
use crate::error::AppError;
use crate::service::validation::{filter_value, parse_id, Violations};

const RESOURCE: &str = "Budget";
pub const DUPLICATE_BUDGET: &str = "Budget already exists for this category and period";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub category: Option<String>,
    pub limit: Option<Decimal>,
    pub period: Option<String>,
}

fn budgetable(raw: &str) -> Option<Category> {
    Category::parse(raw).filter(Category::is_budgetable)
}

impl BudgetInput {
    fn over(self, existing: &Budget) -> Self {
        Self {
            category: self.category.or_else(|| Some(existing.category.as_str().into())),
            limit: self.limit.or(Some(existing.limit)),
            period: self.period.or_else(|| Some(existing.period.as_str().into())),
        }
    }

    fn validate(self) -> Result<BudgetFields, AppError> {
        let mut v = Violations::default();

        let category = v.choice(
            self.category.as_deref(),
            budgetable,
            "Category is required",
            "Please select a valid category",
        );
        let limit = v.amount(self.limit, "Budget limit");
        let period = v
            .optional_choice(
                self.period.as_deref(),
                BudgetPeriod::parse,
                "Period must be either monthly or weekly",
            )
            .unwrap_or_default();

        v.finish()?;

        let (Some(category), Some(limit)) = (category, limit) else {
            return Err(AppError::Validation("Missing required fields".into()));
        };
        Ok(BudgetFields {
            category,
            limit,
            period,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetQuery {
    pub category: Option<String>,
    pub period: Option<String>,
}

/// The (user, category, period) uniqueness constraint is the only one budgets can trip.
fn duplicate_or(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Duplicate(DUPLICATE_BUDGET.into())
        }
        _ => AppError::Database(err),
    }
}

/// Spend in the budget's category from the start of its current window through `now`.
pub async fn progress(
    pool: &Pool<Sqlite>,
    budget: &Budget,
    anchor: PeriodAnchor,
    now: DateTime<Utc>,
) -> Result<BudgetProgress, AppError> {
    let start = anchor.window_start(budget.period, now);
    let amounts = expense_amounts(pool, budget.user_id, budget.category, start, now).await?;
    let spent = checked_total(amounts)?;
    debug!(budget_id = %budget.budget_id, %start, %spent, "budget progress");
    Ok(BudgetProgress::compute(budget.limit, spent))
}

async fn with_progress(
    pool: &Pool<Sqlite>,
    budget: Budget,
    anchor: PeriodAnchor,
    now: DateTime<Utc>,
) -> Result<BudgetWithProgress, AppError> {
    let progress = progress(pool, &budget, anchor, now).await?;
    Ok(BudgetWithProgress { budget, progress })
}

async fn all_with_progress(
    pool: &Pool<Sqlite>,
    budgets: Vec<Budget>,
    anchor: PeriodAnchor,
    now: DateTime<Utc>,
) -> Result<Vec<BudgetWithProgress>, AppError> {
    let mut out = Vec::with_capacity(budgets.len());
    for budget in budgets {
        out.push(with_progress(pool, budget, anchor, now).await?);
    }
    Ok(out)
}

pub async fn list(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    query: &BudgetQuery,
    anchor: PeriodAnchor,
    now: DateTime<Utc>,
) -> Result<Vec<BudgetWithProgress>, AppError> {
    let mut v = Violations::default();
    let category = v.optional_choice(
        filter_value(query.category.as_deref()),
        Category::parse,
        "Please select a valid category",
    );
    let period = v.optional_choice(
        filter_value(query.period.as_deref()),
        BudgetPeriod::parse,
        "Period must be either monthly or weekly",
    );
    v.finish()?;

    let budgets = queries::list_budgets(pool, user_id, category, period).await?;
    all_with_progress(pool, budgets, anchor, now).await
}

async fn find(pool: &Pool<Sqlite>, user_id: Uuid, id: &str) -> Result<Budget, AppError> {
    let budget_id = parse_id(id, RESOURCE)?;
    queries::get_budget(pool, user_id, budget_id)
        .await?
        .ok_or(AppError::NotFound(RESOURCE))
}

pub async fn get(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    id: &str,
    anchor: PeriodAnchor,
    now: DateTime<Utc>,
) -> Result<BudgetWithProgress, AppError> {
    let budget = find(pool, user_id, id).await?;
    with_progress(pool, budget, anchor, now).await
}

pub async fn create(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    input: BudgetInput,
    anchor: PeriodAnchor,
    now: DateTime<Utc>,
) -> Result<BudgetWithProgress, AppError> {
    let budget = Budget::new(user_id, input.validate()?, now);
    queries::insert_budget(pool, &budget).await.map_err(duplicate_or)?;

    info!(budget_id = %budget.budget_id, %user_id, category = budget.category.as_str(), "budget created");
    with_progress(pool, budget, anchor, now).await
}

pub async fn update(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    id: &str,
    input: BudgetInput,
    anchor: PeriodAnchor,
    now: DateTime<Utc>,
) -> Result<BudgetWithProgress, AppError> {
    let mut budget = find(pool, user_id, id).await?;
    let fields = input.over(&budget).validate()?;
    budget.apply(fields, now);

    if !queries::update_budget(pool, &budget).await.map_err(duplicate_or)? {
        return Err(AppError::NotFound(RESOURCE));
    }
    with_progress(pool, budget, anchor, now).await
}

pub async fn delete(pool: &Pool<Sqlite>, user_id: Uuid, id: &str) -> Result<(), AppError> {
    let budget_id = parse_id(id, RESOURCE)?;
    if !queries::delete_budget(pool, user_id, budget_id).await? {
        return Err(AppError::NotFound(RESOURCE));
    }

    info!(%budget_id, %user_id, "budget deleted");
    Ok(())
}

pub async fn analytics(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    anchor: PeriodAnchor,
    now: DateTime<Utc>,
) -> Result<BudgetAnalytics, AppError> {
    let budgets = queries::list_budgets(pool, user_id, None, None).await?;
    let budgets = all_with_progress(pool, budgets, anchor, now).await?;
    Ok(budget_analytics(budgets)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn income_categories_cannot_be_budgeted() {
        let input = BudgetInput {
            category: Some("Salary".into()),
            limit: Some(dec!(100)),
            period: None,
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "Please select a valid category");
    }

    #[test]
    fn period_defaults_to_monthly() {
        let fields = BudgetInput {
            category: Some("Food".into()),
            limit: Some(dec!(1000)),
            period: None,
        }
        .validate()
        .unwrap();
        assert_eq!(fields.period, BudgetPeriod::Monthly);
        assert_eq!(fields.category, Category::Food);
    }

    #[test]
    fn limit_is_required_and_non_negative() {
        let missing = BudgetInput {
            category: Some("Food".into()),
            ..Default::default()
        };
        assert_eq!(missing.validate().unwrap_err().to_string(), "Budget limit is required");

        let negative = BudgetInput {
            category: Some("Food".into()),
            limit: Some(dec!(-5)),
            period: Some("fortnightly".into()),
        };
        assert_eq!(
            negative.validate().unwrap_err().to_string(),
            "Budget limit cannot be negative, Period must be either monthly or weekly"
        );
    }
}
