use axum::{
    routing::{get, put},
    Router,
};

use crate::backend::handlers::{budgets, investments, transactions};
use crate::backend::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/api/transactions/analytics", get(transactions::transaction_analytics))
        .route(
            "/api/transactions/{id}",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .route(
            "/api/budgets",
            get(budgets::list_budgets).post(budgets::create_budget),
        )
        .route("/api/budgets/analytics", get(budgets::budget_analytics))
        .route(
            "/api/budgets/{id}",
            get(budgets::get_budget)
                .put(budgets::update_budget)
                .delete(budgets::delete_budget),
        )
        .route(
            "/api/investments",
            get(investments::list_investments).post(investments::create_investment),
        )
        .route("/api/investments/portfolio", get(investments::portfolio_summary))
        .route("/api/investments/analytics", get(investments::investment_analytics))
        .route(
            "/api/investments/{id}",
            get(investments::get_investment)
                .put(investments::update_investment)
                .delete(investments::delete_investment),
        )
        .route("/api/investments/{id}/value", put(investments::set_current_value))
}
