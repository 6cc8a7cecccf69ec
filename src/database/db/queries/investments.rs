use chrono::{DateTime, Utc};
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use super::{ListOrder, Window};
use crate::database::db::convert::{
    decimal_from_db, decimal_to_db, enum_from_db, time_from_db, time_to_db, uuid_from_db,
};
use crate::database::models::{Investment, InvestmentType};

const COLUMNS: &str = "investment_id, user_id, inv_type, symbol, amount_invested, current_value, \
    quantity, purchase_price, date, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct InvestmentFilter {
    pub inv_type: Option<InvestmentType>,
    /// Case-insensitive substring of the symbol, matched literally.
    pub symbol: Option<String>,
    pub since: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct InvestmentRow {
    investment_id: String,
    user_id: String,
    inv_type: String,
    symbol: String,
    amount_invested: String,
    current_value: String,
    quantity: Option<String>,
    purchase_price: Option<String>,
    date: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<InvestmentRow> for Investment {
    type Error = sqlx::Error;

    fn try_from(row: InvestmentRow) -> Result<Self, Self::Error> {
        Ok(Investment {
            investment_id: uuid_from_db(&row.investment_id)?,
            user_id: uuid_from_db(&row.user_id)?,
            inv_type: enum_from_db(&row.inv_type, InvestmentType::parse)?,
            symbol: row.symbol,
            amount_invested: decimal_from_db(&row.amount_invested)?,
            current_value: decimal_from_db(&row.current_value)?,
            quantity: row.quantity.as_deref().map(decimal_from_db).transpose()?,
            purchase_price: row.purchase_price.as_deref().map(decimal_from_db).transpose()?,
            date: time_from_db(&row.date)?,
            created_at: time_from_db(&row.created_at)?,
            updated_at: time_from_db(&row.updated_at)?,
        })
    }
}

fn push_filter<'a>(qb: &mut QueryBuilder<'a, Sqlite>, user_id: Uuid, filter: &InvestmentFilter) {
    qb.push(" WHERE user_id = ").push_bind(user_id.to_string());

    if let Some(inv_type) = filter.inv_type {
        qb.push(" AND inv_type = ").push_bind(inv_type.as_str());
    }
    if let Some(symbol) = &filter.symbol {
        // instr() keeps %, _ and friends literal
        qb.push(" AND instr(upper(symbol), ")
            .push_bind(symbol.to_uppercase())
            .push(") > 0");
    }
    if let Some(since) = filter.since {
        qb.push(" AND date >= ").push_bind(time_to_db(since));
    }
}

pub async fn insert_investment(pool: &Pool<Sqlite>, inv: &Investment) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO investments (
            investment_id, user_id, inv_type, symbol, amount_invested, current_value,
            quantity, purchase_price, date, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(inv.investment_id.to_string())
    .bind(inv.user_id.to_string())
    .bind(inv.inv_type.as_str())
    .bind(&inv.symbol)
    .bind(decimal_to_db(inv.amount_invested))
    .bind(decimal_to_db(inv.current_value))
    .bind(inv.quantity.map(decimal_to_db))
    .bind(inv.purchase_price.map(decimal_to_db))
    .bind(time_to_db(inv.date))
    .bind(time_to_db(inv.created_at))
    .bind(time_to_db(inv.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_investment(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    investment_id: Uuid,
) -> Result<Option<Investment>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM investments WHERE investment_id = ? AND user_id = ?");
    sqlx::query_as::<_, InvestmentRow>(&sql)
        .bind(investment_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(pool)
        .await?
        .map(Investment::try_from)
        .transpose()
}

pub async fn update_investment(pool: &Pool<Sqlite>, inv: &Investment) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE investments
        SET inv_type = ?, symbol = ?, amount_invested = ?, current_value = ?,
            quantity = ?, purchase_price = ?, date = ?, updated_at = ?
        WHERE investment_id = ? AND user_id = ?
        "#,
    )
    .bind(inv.inv_type.as_str())
    .bind(&inv.symbol)
    .bind(decimal_to_db(inv.amount_invested))
    .bind(decimal_to_db(inv.current_value))
    .bind(inv.quantity.map(decimal_to_db))
    .bind(inv.purchase_price.map(decimal_to_db))
    .bind(time_to_db(inv.date))
    .bind(time_to_db(inv.updated_at))
    .bind(inv.investment_id.to_string())
    .bind(inv.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_investment(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    investment_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM investments WHERE investment_id = ? AND user_id = ?")
        .bind(investment_id.to_string())
        .bind(user_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_investments(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    filter: &InvestmentFilter,
    order: ListOrder,
    window: Window,
) -> Result<Vec<Investment>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM investments"));
    push_filter(&mut qb, user_id, filter);
    qb.push(" ORDER BY ")
        .push(order.column)
        .push(order.sql_direction())
        .push(", investment_id ASC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);

    qb.build_query_as::<InvestmentRow>()
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Investment::try_from)
        .collect()
}

pub async fn count_investments(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    filter: &InvestmentFilter,
) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM investments");
    push_filter(&mut qb, user_id, filter);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Every matching position, newest first.
pub async fn matching_investments(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    filter: &InvestmentFilter,
) -> Result<Vec<Investment>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM investments"));
    push_filter(&mut qb, user_id, filter);
    qb.push(" ORDER BY date DESC, investment_id ASC");

    qb.build_query_as::<InvestmentRow>()
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Investment::try_from)
        .collect()
}
