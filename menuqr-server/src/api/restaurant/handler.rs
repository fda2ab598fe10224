//! Restaurant profile handlers

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
};
use validator::Validate;

use shared::error::{AppError, ErrorCode};
use shared::models::{LogoUploadResponse, RestaurantProfile, RestaurantPublic, RestaurantUpdate};

use crate::api::ApiResult;
use crate::api::upload::read_image;
use crate::auth::RestaurantIdentity;
use crate::db;
use crate::state::AppState;

const LOGO_FIELDS: &[&str] = &["logo", "file"];

/// GET /api/restaurant/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
) -> ApiResult<RestaurantProfile> {
    let profile = db::restaurants::find_profile(&state.pool, identity.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    Ok(Json(profile))
}

/// POST /api/restaurant/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Json(payload): Json<RestaurantUpdate>,
) -> ApiResult<RestaurantProfile> {
    payload.validate()?;
    let profile = db::restaurants::update_profile(&state.pool, identity.restaurant_id, &payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    Ok(Json(profile))
}

/// POST /api/restaurant/logo/upload
pub async fn upload_logo(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    mut multipart: Multipart,
) -> ApiResult<LogoUploadResponse> {
    let jpeg = read_image(&mut multipart, LOGO_FIELDS).await?;
    let logo_url = state.images.store("logos", jpeg).await.map_err(AppError::from)?;

    db::restaurants::update_logo(&state.pool, identity.restaurant_id, &logo_url).await?;
    tracing::info!(restaurant_id = identity.restaurant_id, url = %logo_url, "Logo updated");

    Ok(Json(LogoUploadResponse { logo_url }))
}

/// GET /api/restaurant/{id}/public
pub async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<RestaurantPublic> {
    let restaurant = db::restaurants::find_public(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    Ok(Json(restaurant))
}
