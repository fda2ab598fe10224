//! Menu API
//!
//! `current` and the tree view are public (customers arrive via QR code);
//! everything else is owner-only.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::restaurant_auth::require_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/menu", routes(state))
}

fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/current", get(handler::current))
        .route("/{id}", get(handler::get_tree));

    let owner = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(owner)
}
