//! Dish API (owner-scoped through the dish's menu)

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};

use crate::api::upload::UPLOAD_BODY_LIMIT;
use crate::auth::restaurant_auth::require_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/dish", routes(state))
}

fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/images",
            post(handler::add_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/{id}/images/{image_id}", delete(handler::delete_image))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
