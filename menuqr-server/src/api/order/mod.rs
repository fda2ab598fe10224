//! Order API
//!
//! Placing an order is open to anonymous customers; reading and managing
//! orders is owner-only.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::restaurant_auth::{optional_auth, require_auth};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/order", routes(state))
}

fn routes(state: AppState) -> Router<AppState> {
    let place = Router::new()
        .route("/", post(handler::create))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let owner = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/status", patch(handler::update_status))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    place.merge(owner)
}
