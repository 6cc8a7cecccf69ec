use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use super::{ListOrder, Window};
use crate::database::db::convert::{
    decimal_from_db, decimal_to_db, enum_from_db, time_from_db, time_to_db, uuid_from_db,
};
use crate::database::models::{
    BorrowOrLend, Category, PaymentMethod, SettlementStatus, Transaction, TransactionType,
};

const COLUMNS: &str = "transaction_id, user_id, amount, txn_type, description, category, \
    payment_method, borrow_or_lend, person_name, contact_details, settlement_status, \
    date, created_at, updated_at";

/// Optional equality/range filters for listing; `None` means unconstrained.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub category: Option<Category>,
    pub txn_type: Option<TransactionType>,
    pub payment_method: Option<PaymentMethod>,
    pub borrow_or_lend: Option<BorrowOrLend>,
    pub settlement_status: Option<SettlementStatus>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Raw column text; decoded into a [`Transaction`] once fetched.
#[derive(sqlx::FromRow)]
struct TransactionRow {
    transaction_id: String,
    user_id: String,
    amount: String,
    txn_type: String,
    description: Option<String>,
    category: String,
    payment_method: String,
    borrow_or_lend: String,
    person_name: Option<String>,
    contact_details: Option<String>,
    settlement_status: String,
    date: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = sqlx::Error;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            transaction_id: uuid_from_db(&row.transaction_id)?,
            user_id: uuid_from_db(&row.user_id)?,
            amount: decimal_from_db(&row.amount)?,
            txn_type: enum_from_db(&row.txn_type, TransactionType::parse)?,
            description: row.description,
            category: enum_from_db(&row.category, Category::parse)?,
            payment_method: enum_from_db(&row.payment_method, PaymentMethod::parse)?,
            borrow_or_lend: enum_from_db(&row.borrow_or_lend, BorrowOrLend::parse)?,
            person_name: row.person_name,
            contact_details: row.contact_details,
            settlement_status: enum_from_db(&row.settlement_status, SettlementStatus::parse)?,
            date: time_from_db(&row.date)?,
            created_at: time_from_db(&row.created_at)?,
            updated_at: time_from_db(&row.updated_at)?,
        })
    }
}

fn push_filter<'a>(qb: &mut QueryBuilder<'a, Sqlite>, user_id: Uuid, filter: &TransactionFilter) {
    qb.push(" WHERE user_id = ").push_bind(user_id.to_string());

    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(txn_type) = filter.txn_type {
        qb.push(" AND txn_type = ").push_bind(txn_type.as_str());
    }
    if let Some(method) = filter.payment_method {
        qb.push(" AND payment_method = ").push_bind(method.as_str());
    }
    if let Some(marker) = filter.borrow_or_lend {
        qb.push(" AND borrow_or_lend = ").push_bind(marker.as_str());
    }
    if let Some(status) = filter.settlement_status {
        qb.push(" AND settlement_status = ").push_bind(status.as_str());
    }
    if let Some(start) = filter.start {
        qb.push(" AND date >= ").push_bind(time_to_db(start));
    }
    if let Some(end) = filter.end {
        qb.push(" AND date <= ").push_bind(time_to_db(end));
    }
}

pub async fn insert_transaction(pool: &Pool<Sqlite>, txn: &Transaction) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO transactions (
            transaction_id, user_id, amount, txn_type, description, category,
            payment_method, borrow_or_lend, person_name, contact_details,
            settlement_status, date, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(txn.transaction_id.to_string())
    .bind(txn.user_id.to_string())
    .bind(decimal_to_db(txn.amount))
    .bind(txn.txn_type.as_str())
    .bind(&txn.description)
    .bind(txn.category.as_str())
    .bind(txn.payment_method.as_str())
    .bind(txn.borrow_or_lend.as_str())
    .bind(&txn.person_name)
    .bind(&txn.contact_details)
    .bind(txn.settlement_status.as_str())
    .bind(time_to_db(txn.date))
    .bind(time_to_db(txn.created_at))
    .bind(time_to_db(txn.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_transaction(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    transaction_id: Uuid,
) -> Result<Option<Transaction>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM transactions WHERE transaction_id = ? AND user_id = ?");
    sqlx::query_as::<_, TransactionRow>(&sql)
        .bind(transaction_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(pool)
        .await?
        .map(Transaction::try_from)
        .transpose()
}

// Owner is part of the WHERE clause; returns false when nothing matched.
pub async fn update_transaction(pool: &Pool<Sqlite>, txn: &Transaction) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE transactions
        SET amount = ?, txn_type = ?, description = ?, category = ?, payment_method = ?,
            borrow_or_lend = ?, person_name = ?, contact_details = ?, settlement_status = ?,
            date = ?, updated_at = ?
        WHERE transaction_id = ? AND user_id = ?
        "#,
    )
    .bind(decimal_to_db(txn.amount))
    .bind(txn.txn_type.as_str())
    .bind(&txn.description)
    .bind(txn.category.as_str())
    .bind(txn.payment_method.as_str())
    .bind(txn.borrow_or_lend.as_str())
    .bind(&txn.person_name)
    .bind(&txn.contact_details)
    .bind(txn.settlement_status.as_str())
    .bind(time_to_db(txn.date))
    .bind(time_to_db(txn.updated_at))
    .bind(txn.transaction_id.to_string())
    .bind(txn.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_transaction(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    transaction_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE transaction_id = ? AND user_id = ?")
        .bind(transaction_id.to_string())
        .bind(user_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_transactions(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    filter: &TransactionFilter,
    order: ListOrder,
    window: Window,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM transactions"));
    push_filter(&mut qb, user_id, filter);
    qb.push(" ORDER BY ")
        .push(order.column)
        .push(order.sql_direction())
        .push(", transaction_id ASC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);

    qb.build_query_as::<TransactionRow>()
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Transaction::try_from)
        .collect()
}

pub async fn count_transactions(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    filter: &TransactionFilter,
) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM transactions");
    push_filter(&mut qb, user_id, filter);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Every transaction matching `filter`, oldest first. Feeds the analytics reductions.
pub async fn matching_transactions(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM transactions"));
    push_filter(&mut qb, user_id, filter);
    qb.push(" ORDER BY date ASC, transaction_id ASC");

    qb.build_query_as::<TransactionRow>()
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Transaction::try_from)
        .collect()
}

/// Expense amounts in `category` dated within `[from, to]`.
pub async fn expense_amounts(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    category: Category,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Decimal>, sqlx::Error> {
    let amounts: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT amount
        FROM transactions
        WHERE user_id = ? AND category = ? AND txn_type = 'expense'
          AND date >= ? AND date <= ?
        "#,
    )
    .bind(user_id.to_string())
    .bind(category.as_str())
    .bind(time_to_db(from))
    .bind(time_to_db(to))
    .fetch_all(pool)
    .await?;

    amounts.iter().map(|raw| decimal_from_db(raw)).collect()
}
