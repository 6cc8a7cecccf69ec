use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::analytics::budgets::{BudgetAnalytics, BudgetWithProgress};
use crate::backend::extract::{ApiJson, ApiQuery, AuthUser};
use crate::backend::handlers::deleted;
use crate::backend::response::Envelope;
use crate::backend::AppState;
use crate::error::AppError;
use crate::service::budgets::{self, BudgetInput, BudgetQuery};

pub async fn list_budgets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<BudgetQuery>,
) -> Result<Json<Envelope<Vec<BudgetWithProgress>>>, AppError> {
    let budgets = budgets::list(&state.db, user_id, &query, state.anchor, Utc::now()).await?;
    Ok(Json(Envelope::list(budgets)))
}

pub async fn get_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<BudgetWithProgress>>, AppError> {
    let budget = budgets::get(&state.db, user_id, &id, state.anchor, Utc::now()).await?;
    Ok(Json(Envelope::data(budget)))
}

pub async fn create_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(input): ApiJson<BudgetInput>,
) -> Result<(StatusCode, Json<Envelope<BudgetWithProgress>>), AppError> {
    let budget = budgets::create(&state.db, user_id, input, state.anchor, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(budget))))
}

pub async fn update_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<BudgetInput>,
) -> Result<Json<Envelope<BudgetWithProgress>>, AppError> {
    let budget = budgets::update(&state.db, user_id, &id, input, state.anchor, Utc::now()).await?;
    Ok(Json(Envelope::data(budget)))
}

pub async fn delete_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Value>>, AppError> {
    budgets::delete(&state.db, user_id, &id).await?;
    Ok(Json(deleted("Budget")))
}

pub async fn budget_analytics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Envelope<BudgetAnalytics>>, AppError> {
    let analytics = budgets::analytics(&state.db, user_id, state.anchor, Utc::now()).await?;
    Ok(Json(Envelope::data(analytics)))
}
