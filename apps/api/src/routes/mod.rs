pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::invoices::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Admin invoice API
        .route(
            "/api/admin/invoices/:id/template-data",
            get(handlers::get_template_data),
        )
        .route(
            "/api/admin/generate-invoice",
            post(handlers::generate_invoice),
        )
        .route(
            "/api/admin/currency-rates",
            get(handlers::get_currency_rates),
        )
        .with_state(state)
}
