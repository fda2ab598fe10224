use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use shared::error::{AppError, ErrorCode};
use shared::models::{Section, SectionInput};

use crate::api::ApiResult;
use crate::auth::RestaurantIdentity;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

fn name_conflict(e: sqlx::Error) -> ServiceError {
    if db::is_unique_violation(&e) {
        AppError::new(ErrorCode::SectionNameExists).into()
    } else {
        e.into()
    }
}

/// GET /api/section
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
) -> ApiResult<Vec<Section>> {
    let sections = db::sections::list(&state.pool, identity.restaurant_id).await?;
    Ok(Json(sections))
}

/// POST /api/section
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Json(payload): Json<SectionInput>,
) -> Result<(StatusCode, Json<Section>), ServiceError> {
    payload.validate()?;
    let section = db::sections::create(
        &state.pool,
        identity.restaurant_id,
        payload.name.trim(),
        shared::util::now_millis(),
    )
    .await
    .map_err(name_conflict)?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// PUT /api/section/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<SectionInput>,
) -> ApiResult<Section> {
    payload.validate()?;
    let section = db::sections::rename(&state.pool, id, identity.restaurant_id, payload.name.trim())
        .await
        .map_err(name_conflict)?
        .ok_or_else(|| AppError::new(ErrorCode::SectionNotFound))?;
    Ok(Json(section))
}

/// DELETE /api/section/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    let deleted = db::sections::delete(&state.pool, id, identity.restaurant_id).await?;
    if deleted == 0 {
        return Err(AppError::new(ErrorCode::SectionNotFound).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
