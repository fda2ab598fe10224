//! Section API (owner-scoped)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::restaurant_auth::require_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/section", routes(state))
}

fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
