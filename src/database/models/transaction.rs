use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Net Banking")]
    NetBanking,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        Self::Cash,
        Self::Upi,
        Self::CreditCard,
        Self::DebitCard,
        Self::NetBanking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Upi => "UPI",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::NetBanking => "Net Banking",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowOrLend {
    #[default]
    None,
    Borrow,
    Lend,
}

impl BorrowOrLend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Borrow => "borrow",
            Self::Lend => "lend",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "borrow" => Some(Self::Borrow),
            "lend" => Some(Self::Lend),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Settled,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Settled => "settled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "settled" => Some(Self::Settled),
            _ => None,
        }
    }
}

/// Validated, user-editable part of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    pub amount: Decimal,
    pub txn_type: TransactionType,
    pub description: Option<String>,
    pub category: Category,
    pub payment_method: PaymentMethod,
    pub borrow_or_lend: BorrowOrLend,
    pub person_name: Option<String>,
    pub contact_details: Option<String>,
    pub settlement_status: SettlementStatus,
    pub date: DateTime<Utc>,
}

impl TransactionFields {
    /// A plain income/expense carries no counterparty and is never "settled".
    pub fn clear_borrow_lend(&mut self) {
        if self.borrow_or_lend == BorrowOrLend::None {
            self.person_name = None;
            self.contact_details = None;
            self.settlement_status = SettlementStatus::Pending;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub transaction_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub txn_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub payment_method: PaymentMethod,
    pub borrow_or_lend: BorrowOrLend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<String>,
    pub settlement_status: SettlementStatus,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(user_id: Uuid, fields: TransactionFields, now: DateTime<Utc>) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            user_id,
            amount: fields.amount,
            txn_type: fields.txn_type,
            description: fields.description,
            category: fields.category,
            payment_method: fields.payment_method,
            borrow_or_lend: fields.borrow_or_lend,
            person_name: fields.person_name,
            contact_details: fields.contact_details,
            settlement_status: fields.settlement_status,
            date: fields.date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: TransactionFields, now: DateTime<Utc>) {
        self.amount = fields.amount;
        self.txn_type = fields.txn_type;
        self.description = fields.description;
        self.category = fields.category;
        self.payment_method = fields.payment_method;
        self.borrow_or_lend = fields.borrow_or_lend;
        self.person_name = fields.person_name;
        self.contact_details = fields.contact_details;
        self.settlement_status = fields.settlement_status;
        self.date = fields.date;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn lend_fields() -> TransactionFields {
        TransactionFields {
            amount: dec!(120),
            txn_type: TransactionType::Expense,
            description: None,
            category: Category::Other,
            payment_method: PaymentMethod::Upi,
            borrow_or_lend: BorrowOrLend::Lend,
            person_name: Some("Ravi".into()),
            contact_details: Some("ravi@example.com".into()),
            settlement_status: SettlementStatus::Settled,
            date: Utc::now(),
        }
    }

    #[test]
    fn clearing_keeps_counterparty_for_borrow_or_lend() {
        let mut fields = lend_fields();
        fields.clear_borrow_lend();
        assert_eq!(fields.person_name.as_deref(), Some("Ravi"));
        assert_eq!(fields.settlement_status, SettlementStatus::Settled);
    }

    #[test]
    fn clearing_resets_plain_transactions() {
        let mut fields = lend_fields();
        fields.borrow_or_lend = BorrowOrLend::None;
        fields.clear_borrow_lend();
        assert_eq!(fields.person_name, None);
        assert_eq!(fields.contact_details, None);
        assert_eq!(fields.settlement_status, SettlementStatus::Pending);
    }

    #[test]
    fn payment_method_uses_display_names() {
        assert_eq!(PaymentMethod::parse("Net Banking"), Some(PaymentMethod::NetBanking));
        assert_eq!(PaymentMethod::parse("NetBanking"), None);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"Credit Card\""
        );
    }
}
