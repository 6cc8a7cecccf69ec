use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::percent_change;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentType {
    Stock,
    Crypto,
}

impl InvestmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Crypto => "crypto",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stock" => Some(Self::Stock),
            "crypto" => Some(Self::Crypto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Profit,
    Loss,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentFields {
    pub inv_type: InvestmentType,
    pub symbol: String,
    pub amount_invested: Decimal,
    pub current_value: Decimal,
    pub quantity: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(rename = "_id")]
    pub investment_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub inv_type: InvestmentType,
    pub symbol: String,
    pub amount_invested: Decimal,
    pub current_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Decimal>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Investment {
    pub fn new(user_id: Uuid, fields: InvestmentFields, now: DateTime<Utc>) -> Self {
        Self {
            investment_id: Uuid::new_v4(),
            user_id,
            inv_type: fields.inv_type,
            symbol: fields.symbol,
            amount_invested: fields.amount_invested,
            current_value: fields.current_value,
            quantity: fields.quantity,
            purchase_price: fields.purchase_price,
            date: fields.date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: InvestmentFields, now: DateTime<Utc>) {
        self.inv_type = fields.inv_type;
        self.symbol = fields.symbol;
        self.amount_invested = fields.amount_invested;
        self.current_value = fields.current_value;
        self.quantity = fields.quantity;
        self.purchase_price = fields.purchase_price;
        self.date = fields.date;
        self.updated_at = now;
    }

    pub fn profit_loss(&self) -> Decimal {
        self.current_value - self.amount_invested
    }

    /// Zero when nothing was invested.
    pub fn profit_loss_percentage(&self) -> Decimal {
        percent_change(self.amount_invested, self.current_value)
    }

    pub fn status(&self) -> InvestmentStatus {
        let pl = self.profit_loss();
        if pl > Decimal::ZERO {
            InvestmentStatus::Profit
        } else if pl < Decimal::ZERO {
            InvestmentStatus::Loss
        } else {
            InvestmentStatus::Neutral
        }
    }
}

/// Wire shape of an investment: the stored record plus its derived valuation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentView {
    #[serde(flatten)]
    pub investment: Investment,
    pub profit_loss: Decimal,
    pub profit_loss_percentage: Decimal,
    pub status: InvestmentStatus,
}

impl From<Investment> for InvestmentView {
    fn from(investment: Investment) -> Self {
        Self {
            profit_loss: investment.profit_loss(),
            profit_loss_percentage: investment.profit_loss_percentage(),
            status: investment.status(),
            investment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(invested: Decimal, current: Decimal) -> Investment {
        Investment::new(
            Uuid::new_v4(),
            InvestmentFields {
                inv_type: InvestmentType::Stock,
                symbol: "AAPL".into(),
                amount_invested: invested,
                current_value: current,
                quantity: None,
                purchase_price: None,
                date: Utc::now(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn derived_values_follow_current_value() {
        let gain = position(dec!(1000), dec!(1250));
        assert_eq!(gain.profit_loss(), dec!(250));
        assert_eq!(gain.profit_loss_percentage(), dec!(25));
        assert_eq!(gain.status(), InvestmentStatus::Profit);

        let loss = position(dec!(400), dec!(300));
        assert_eq!(loss.profit_loss(), dec!(-100));
        assert_eq!(loss.profit_loss_percentage(), dec!(-25));
        assert_eq!(loss.status(), InvestmentStatus::Loss);
    }

    #[test]
    fn zero_invested_has_zero_percentage() {
        let free = position(dec!(0), dec!(50));
        assert_eq!(free.profit_loss(), dec!(50));
        assert_eq!(free.profit_loss_percentage(), Decimal::ZERO);
        assert_eq!(free.status(), InvestmentStatus::Profit);
    }

    #[test]
    fn view_flattens_record_and_valuation() {
        let view = InvestmentView::from(position(dec!(100), dec!(100)));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["type"], "stock");
        assert_eq!(json["status"], "neutral");
        assert_eq!(json["profitLoss"], 0.0);
    }
}
