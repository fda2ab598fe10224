//! Dish API Handlers

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use shared::error::{AppError, ErrorCode};
use shared::models::{Dish, DishCreate, DishImage, DishUpdate};
use shared::util::now_millis;

use crate::api::ApiResult;
use crate::api::upload::read_image;
use crate::auth::RestaurantIdentity;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

const IMAGE_FIELDS: &[&str] = &["image", "file"];

#[derive(Debug, Default, Deserialize)]
pub struct DishQuery {
    pub menu_id: Option<i64>,
    pub section_id: Option<i64>,
}

fn check_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::DishInvalidPrice).with_detail("price", price.to_string()));
    }
    // NUMERIC(10,2)
    if price >= Decimal::from(100_000_000) {
        return Err(AppError::with_message(ErrorCode::DishInvalidPrice, "Price is too large"));
    }
    Ok(())
}

async fn owned_dish(state: &AppState, id: i64, restaurant_id: i64) -> Result<Dish, ServiceError> {
    db::dishes::find_owned(&state.pool, id, restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DishNotFound).into())
}

async fn ensure_section(state: &AppState, id: i64, restaurant_id: i64) -> Result<(), ServiceError> {
    db::sections::find_owned(&state.pool, id, restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SectionNotFound))?;
    Ok(())
}

/// GET /api/dish
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Query(query): Query<DishQuery>,
) -> ApiResult<Vec<Dish>> {
    let dishes = db::dishes::list(
        &state.pool,
        identity.restaurant_id,
        query.menu_id,
        query.section_id,
    )
    .await?;
    Ok(Json(dishes))
}

/// GET /api/dish/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Dish> {
    Ok(Json(owned_dish(&state, id, identity.restaurant_id).await?))
}

/// POST /api/dish
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Json(payload): Json<DishCreate>,
) -> Result<(StatusCode, Json<Dish>), ServiceError> {
    payload.validate()?;
    check_price(payload.price)?;

    db::menus::find_owned(&state.pool, payload.menu_id, identity.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;
    ensure_section(&state, payload.section_id, identity.restaurant_id).await?;

    let dish = db::dishes::create(&state.pool, &payload, now_millis()).await?;
    tracing::info!(dish_id = dish.id, menu_id = dish.menu_id, "Dish created");
    Ok((StatusCode::CREATED, Json(dish)))
}

/// PUT /api/dish/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<DishUpdate>,
) -> ApiResult<Dish> {
    payload.validate()?;
    if let Some(price) = payload.price {
        check_price(price)?;
    }
    owned_dish(&state, id, identity.restaurant_id).await?;
    if let Some(section_id) = payload.section_id {
        ensure_section(&state, section_id, identity.restaurant_id).await?;
    }

    db::dishes::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DishNotFound))?;
    // Re-read to include images
    Ok(Json(owned_dish(&state, id, identity.restaurant_id).await?))
}

/// DELETE /api/dish/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    owned_dish(&state, id, identity.restaurant_id).await?;
    db::dishes::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/dish/{id}/images
pub async fn add_image(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DishImage>), ServiceError> {
    owned_dish(&state, id, identity.restaurant_id).await?;

    let jpeg = read_image(&mut multipart, IMAGE_FIELDS).await?;
    let url = state.images.store("dishes", jpeg).await.map_err(AppError::from)?;

    let image = db::dishes::add_image(&state.pool, id, &url, now_millis()).await?;
    tracing::info!(dish_id = id, image_id = image.id, "Dish image added");
    Ok((StatusCode::CREATED, Json(image)))
}

/// DELETE /api/dish/{id}/images/{image_id}
pub async fn delete_image(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path((id, image_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ServiceError> {
    owned_dish(&state, id, identity.restaurant_id).await?;
    let deleted = db::dishes::delete_image(&state.pool, id, image_id).await?;
    if deleted == 0 {
        return Err(AppError::new(ErrorCode::DishImageNotFound).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
