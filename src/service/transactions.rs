use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use tracing::info;
use uuid::Uuid;

use crate::analytics::period::trailing_months_start;
use crate::analytics::transactions::{transaction_analytics, TransactionAnalytics};
use crate::database::db::queries::transactions::{self as queries, TransactionFilter};
use crate::database::db::queries::ListOrder;
use crate::database::models::{
    BorrowOrLend, Category, PaymentMethod, SettlementStatus, Transaction, TransactionFields,
    TransactionType,
};
use crate::error::AppError;
use crate::service::pagination::{parse_sort, PageRequest, Paged};
use crate::service::validation::{filter_value, parse_id, Violations};

const RESOURCE: &str = "Transaction";

const SORT_FIELDS: &[(&str, &str)] = &[
    ("date", "date"),
    ("amount", "CAST(amount AS REAL)"),
    ("category", "category"),
    ("type", "txn_type"),
    ("paymentMethod", "payment_method"),
    ("createdAt", "created_at"),
];

const DEFAULT_ORDER: ListOrder = ListOrder {
    column: "date",
    descending: true,
};

/// Request body for create and update. On update, absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub txn_type: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub borrow_or_lend: Option<String>,
    pub person_name: Option<String>,
    pub contact_details: Option<String>,
    pub settlement_status: Option<String>,
    pub date: Option<String>,
}

impl TransactionInput {
    fn over(self, existing: &Transaction) -> Self {
        Self {
            amount: self.amount.or(Some(existing.amount)),
            txn_type: self.txn_type.or_else(|| Some(existing.txn_type.as_str().into())),
            description: self.description.or_else(|| existing.description.clone()),
            category: self.category.or_else(|| Some(existing.category.as_str().into())),
            payment_method: self
                .payment_method
                .or_else(|| Some(existing.payment_method.as_str().into())),
            borrow_or_lend: self
                .borrow_or_lend
                .or_else(|| Some(existing.borrow_or_lend.as_str().into())),
            person_name: self.person_name.or_else(|| existing.person_name.clone()),
            contact_details: self.contact_details.or_else(|| existing.contact_details.clone()),
            settlement_status: self
                .settlement_status
                .or_else(|| Some(existing.settlement_status.as_str().into())),
            date: self.date.or_else(|| Some(existing.date.to_rfc3339())),
        }
    }

    fn validate(self, now: DateTime<Utc>) -> Result<TransactionFields, AppError> {
        let mut v = Violations::default();

        let amount = v.amount(self.amount, "Amount");
        let txn_type = v.choice(
            self.txn_type.as_deref(),
            TransactionType::parse,
            "Transaction type is required",
            "Transaction type must be either income or expense",
        );
        let description = v.text(
            self.description,
            200,
            "Description cannot be more than 200 characters",
        );
        let category = v.choice(
            self.category.as_deref(),
            Category::parse,
            "Category is required",
            "Please select a valid category",
        );
        let payment_method = v.choice(
            self.payment_method.as_deref(),
            PaymentMethod::parse,
            "Payment method is required",
            "Please select a valid payment method",
        );
        let borrow_or_lend = v
            .optional_choice(
                self.borrow_or_lend.as_deref(),
                BorrowOrLend::parse,
                "Borrow or lend must be none, borrow, or lend",
            )
            .unwrap_or_default();
        let person_name = v.text(
            self.person_name,
            50,
            "Person name cannot be more than 50 characters",
        );
        let contact_details = v.text(
            self.contact_details,
            100,
            "Contact details cannot be more than 100 characters",
        );
        let settlement_status = v
            .optional_choice(
                self.settlement_status.as_deref(),
                SettlementStatus::parse,
                "Settlement status must be pending or settled",
            )
            .unwrap_or_default();
        let date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            None => Some(now),
            Some(raw) => v.timestamp(Some(raw), "Please provide a valid date"),
        };

        if borrow_or_lend != BorrowOrLend::None && person_name.is_none() {
            v.push("Person name is required when borrowing or lending");
        }

        v.finish()?;

        let (Some(amount), Some(txn_type), Some(category), Some(payment_method), Some(date)) =
            (amount, txn_type, category, payment_method, date)
        else {
            return Err(AppError::Validation("Missing required fields".into()));
        };

        let mut fields = TransactionFields {
            amount,
            txn_type,
            description,
            category,
            payment_method,
            borrow_or_lend,
            person_name,
            contact_details,
            settlement_status,
            date,
        };
        fields.clear_borrow_lend();
        Ok(fields)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub txn_type: Option<String>,
    pub payment_method: Option<String>,
    pub borrow_or_lend: Option<String>,
    pub settlement_status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

impl TransactionQuery {
    fn filter(&self) -> Result<TransactionFilter, AppError> {
        let mut v = Violations::default();

        let filter = TransactionFilter {
            category: v.optional_choice(
                filter_value(self.category.as_deref()),
                Category::parse,
                "Please select a valid category",
            ),
            txn_type: v.optional_choice(
                filter_value(self.txn_type.as_deref()),
                TransactionType::parse,
                "Transaction type must be either income or expense",
            ),
            payment_method: v.optional_choice(
                filter_value(self.payment_method.as_deref()),
                PaymentMethod::parse,
                "Please select a valid payment method",
            ),
            borrow_or_lend: v.optional_choice(
                filter_value(self.borrow_or_lend.as_deref()),
                BorrowOrLend::parse,
                "Borrow or lend must be none, borrow, or lend",
            ),
            settlement_status: v.optional_choice(
                filter_value(self.settlement_status.as_deref()),
                SettlementStatus::parse,
                "Settlement status must be pending or settled",
            ),
            start: v.timestamp(self.start_date.as_deref(), "Invalid startDate"),
            end: v.timestamp(self.end_date.as_deref(), "Invalid endDate"),
        };

        v.finish()?;
        Ok(filter)
    }
}

pub async fn list(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    query: &TransactionQuery,
) -> Result<Paged<Transaction>, AppError> {
    let filter = query.filter()?;
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());
    let order = parse_sort(query.sort.as_deref(), SORT_FIELDS, DEFAULT_ORDER);

    let total = queries::count_transactions(pool, user_id, &filter).await?;
    let items = queries::list_transactions(pool, user_id, &filter, order, request.window()).await?;

    Ok(request.paginate(items, u64::try_from(total).unwrap_or_default()))
}

pub async fn get(pool: &Pool<Sqlite>, user_id: Uuid, id: &str) -> Result<Transaction, AppError> {
    let transaction_id = parse_id(id, RESOURCE)?;
    queries::get_transaction(pool, user_id, transaction_id)
        .await?
        .ok_or(AppError::NotFound(RESOURCE))
}

pub async fn create(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    input: TransactionInput,
    now: DateTime<Utc>,
) -> Result<Transaction, AppError> {
    let fields = input.validate(now)?;
    let transaction = Transaction::new(user_id, fields, now);
    queries::insert_transaction(pool, &transaction).await?;

    info!(transaction_id = %transaction.transaction_id, %user_id, "transaction created");
    Ok(transaction)
}

pub async fn update(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    id: &str,
    input: TransactionInput,
    now: DateTime<Utc>,
) -> Result<Transaction, AppError> {
    let mut transaction = get(pool, user_id, id).await?;
    let fields = input.over(&transaction).validate(now)?;
    transaction.apply(fields, now);

    if !queries::update_transaction(pool, &transaction).await? {
        return Err(AppError::NotFound(RESOURCE));
    }
    Ok(transaction)
}

pub async fn delete(pool: &Pool<Sqlite>, user_id: Uuid, id: &str) -> Result<(), AppError> {
    let transaction_id = parse_id(id, RESOURCE)?;
    if !queries::delete_transaction(pool, user_id, transaction_id).await? {
        return Err(AppError::NotFound(RESOURCE));
    }

    info!(%transaction_id, %user_id, "transaction deleted");
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Aggregates over `[startDate, endDate]`; the monthly trend always covers the trailing
/// twelve months.
pub async fn analytics(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    query: &AnalyticsQuery,
    now: DateTime<Utc>,
) -> Result<TransactionAnalytics, AppError> {
    let mut v = Violations::default();
    let range = TransactionFilter {
        start: v.timestamp(query.start_date.as_deref(), "Invalid startDate"),
        end: v.timestamp(query.end_date.as_deref(), "Invalid endDate"),
        ..Default::default()
    };
    v.finish()?;

    let trailing_filter = TransactionFilter {
        start: Some(trailing_months_start(now, 12)),
        ..Default::default()
    };

    let in_range = queries::matching_transactions(pool, user_id, &range).await?;
    let trailing = queries::matching_transactions(pool, user_id, &trailing_filter).await?;

    Ok(transaction_analytics(&in_range, &trailing)?)
}
