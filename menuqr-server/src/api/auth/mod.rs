//! Account API: registration, login, password reset, current identity

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::auth::restaurant_auth::require_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new().nest("/api/auth", routes(state))
}

fn routes(state: AppState) -> Router<AppState> {
    let register = Router::new()
        .route("/register", post(handler::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let login = Router::new()
        .route("/login", post(handler::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    let reset = Router::new()
        .route("/forgot-password", post(handler::forgot_password))
        .route("/verify-reset-token", post(handler::verify_reset_token))
        .route("/reset-password", post(handler::reset_password));

    let me = Router::new()
        .route("/me", get(handler::me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    register.merge(login).merge(reset).merge(me)
}
