use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::analytics::transactions::TransactionAnalytics;
use crate::backend::extract::{ApiJson, ApiQuery, AuthUser};
use crate::backend::handlers::deleted;
use crate::backend::response::Envelope;
use crate::backend::AppState;
use crate::database::models::Transaction;
use crate::error::AppError;
use crate::service::transactions::{self, AnalyticsQuery, TransactionInput, TransactionQuery};

pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Json<Envelope<Vec<Transaction>>>, AppError> {
    let page = transactions::list(&state.db, user_id, &query).await?;
    Ok(Json(Envelope::page(page)))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Transaction>>, AppError> {
    let transaction = transactions::get(&state.db, user_id, &id).await?;
    Ok(Json(Envelope::data(transaction)))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(input): ApiJson<TransactionInput>,
) -> Result<(StatusCode, Json<Envelope<Transaction>>), AppError> {
    let transaction = transactions::create(&state.db, user_id, input, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(transaction))))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TransactionInput>,
) -> Result<Json<Envelope<Transaction>>, AppError> {
    let transaction = transactions::update(&state.db, user_id, &id, input, Utc::now()).await?;
    Ok(Json(Envelope::data(transaction)))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Value>>, AppError> {
    transactions::delete(&state.db, user_id, &id).await?;
    Ok(Json(deleted("Transaction")))
}

pub async fn transaction_analytics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<AnalyticsQuery>,
) -> Result<Json<Envelope<TransactionAnalytics>>, AppError> {
    let analytics = transactions::analytics(&state.db, user_id, &query, Utc::now()).await?;
    Ok(Json(Envelope::data(analytics)))
}
