//! HTTP API
//!
//! One sub-module per resource, each exposing `router(state)`; `build_app`
//! merges them and adds the tower-http stack.

pub mod auth;
pub mod dish;
pub mod health;
pub mod menu;
pub mod order;
pub mod restaurant;
pub mod section;
pub mod statistics;
pub mod upload;

use axum::Router;
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, ServiceError>;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse::<HeaderValue>().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// Routes only, with state applied
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state.clone()))
        .merge(restaurant::router(state.clone()))
        .merge(menu::router(state.clone()))
        .merge(section::router(state.clone()))
        .merge(dish::router(state.clone()))
        .merge(order::router(state.clone()))
        .merge(statistics::router(state.clone()))
        .with_state(state)
}

/// Fully configured application: routes, static uploads and middleware
pub fn build_app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.images.upload_dir());
    let cors = cors_layer(&state.cors_origins);

    build_router(state)
        .nest_service("/uploads", uploads)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
