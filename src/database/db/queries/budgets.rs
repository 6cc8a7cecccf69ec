use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::database::db::convert::{
    decimal_from_db, decimal_to_db, enum_from_db, time_from_db, time_to_db, uuid_from_db,
};
use crate::database::models::{Budget, BudgetPeriod, Category};

const COLUMNS: &str = "budget_id, user_id, category, amount, period, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BudgetRow {
    budget_id: String,
    user_id: String,
    category: String,
    amount: String,
    period: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = sqlx::Error;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        Ok(Budget {
            budget_id: uuid_from_db(&row.budget_id)?,
            user_id: uuid_from_db(&row.user_id)?,
            category: enum_from_db(&row.category, Category::parse)?,
            limit: decimal_from_db(&row.amount)?,
            period: enum_from_db(&row.period, BudgetPeriod::parse)?,
            created_at: time_from_db(&row.created_at)?,
            updated_at: time_from_db(&row.updated_at)?,
        })
    }
}

// Fails with a unique violation when (user, category, period) is taken.
pub async fn insert_budget(pool: &Pool<Sqlite>, budget: &Budget) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO budgets (budget_id, user_id, category, amount, period, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(budget.budget_id.to_string())
    .bind(budget.user_id.to_string())
    .bind(budget.category.as_str())
    .bind(decimal_to_db(budget.limit))
    .bind(budget.period.as_str())
    .bind(time_to_db(budget.created_at))
    .bind(time_to_db(budget.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_budget(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    budget_id: Uuid,
) -> Result<Option<Budget>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM budgets WHERE budget_id = ? AND user_id = ?");
    sqlx::query_as::<_, BudgetRow>(&sql)
        .bind(budget_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(pool)
        .await?
        .map(Budget::try_from)
        .transpose()
}

pub async fn update_budget(pool: &Pool<Sqlite>, budget: &Budget) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE budgets
        SET category = ?, amount = ?, period = ?, updated_at = ?
        WHERE budget_id = ? AND user_id = ?
        "#,
    )
    .bind(budget.category.as_str())
    .bind(decimal_to_db(budget.limit))
    .bind(budget.period.as_str())
    .bind(time_to_db(budget.updated_at))
    .bind(budget.budget_id.to_string())
    .bind(budget.user_id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_budget(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    budget_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM budgets WHERE budget_id = ? AND user_id = ?")
        .bind(budget_id.to_string())
        .bind(user_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Budgets ordered by category then period.
pub async fn list_budgets(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    category: Option<Category>,
    period: Option<BudgetPeriod>,
) -> Result<Vec<Budget>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM budgets WHERE user_id = "));
    qb.push_bind(user_id.to_string());
    if let Some(category) = category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(period) = period {
        qb.push(" AND period = ").push_bind(period.as_str());
    }
    qb.push(" ORDER BY category ASC, period ASC");

    qb.build_query_as::<BudgetRow>()
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Budget::try_from)
        .collect()
}
