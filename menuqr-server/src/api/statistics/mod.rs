//! Owner dashboard statistics (read-only)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::restaurant_auth::require_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/statistics", routes(state))
}

fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/overview", get(handler::overview))
        .route("/orders-by-status", get(handler::orders_by_status))
        .route("/orders-by-day", get(handler::orders_by_day))
        .route("/top-dishes", get(handler::top_dishes))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
