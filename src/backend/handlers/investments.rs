use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::analytics::investments::{InvestmentAnalytics, PortfolioSummary};
use crate::backend::extract::{ApiJson, ApiQuery, AuthUser};
use crate::backend::handlers::deleted;
use crate::backend::response::Envelope;
use crate::backend::AppState;
use crate::database::models::InvestmentView;
use crate::error::AppError;
use crate::service::investments::{self, InvestmentInput, InvestmentQuery, ValueInput};

pub async fn list_investments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<InvestmentQuery>,
) -> Result<Json<Envelope<Vec<InvestmentView>>>, AppError> {
    let page = investments::list(&state.db, user_id, &query).await?;
    Ok(Json(Envelope::page(page)))
}

pub async fn get_investment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<InvestmentView>>, AppError> {
    let investment = investments::get(&state.db, user_id, &id).await?;
    Ok(Json(Envelope::data(investment)))
}

pub async fn create_investment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(input): ApiJson<InvestmentInput>,
) -> Result<(StatusCode, Json<Envelope<InvestmentView>>), AppError> {
    let investment = investments::create(&state.db, user_id, input, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(investment))))
}

pub async fn update_investment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<InvestmentInput>,
) -> Result<Json<Envelope<InvestmentView>>, AppError> {
    let investment = investments::update(&state.db, user_id, &id, input, Utc::now()).await?;
    Ok(Json(Envelope::data(investment)))
}

pub async fn delete_investment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Value>>, AppError> {
    investments::delete(&state.db, user_id, &id).await?;
    Ok(Json(deleted("Investment")))
}

pub async fn set_current_value(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ValueInput>,
) -> Result<Json<Envelope<InvestmentView>>, AppError> {
    let investment =
        investments::set_current_value(&state.db, user_id, &id, input, Utc::now()).await?;
    Ok(Json(Envelope::data(investment)))
}

pub async fn portfolio_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Envelope<PortfolioSummary>>, AppError> {
    let summary = investments::portfolio(&state.db, user_id).await?;
    Ok(Json(Envelope::data(summary)))
}

pub async fn investment_analytics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Envelope<InvestmentAnalytics>>, AppError> {
    let analytics = investments::analytics(&state.db, user_id, Utc::now()).await?;
    Ok(Json(Envelope::data(analytics)))
}
