//! Restaurant profile API

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::api::upload::UPLOAD_BODY_LIMIT;
use crate::auth::restaurant_auth::require_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/restaurant", routes(state))
}

fn routes(state: AppState) -> Router<AppState> {
    let owner = Router::new()
        .route("/profile", get(handler::get_profile).post(handler::update_profile))
        .route(
            "/logo/upload",
            post(handler::upload_logo).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    let public = Router::new().route("/{id}/public", get(handler::get_public));

    owner.merge(public)
}
