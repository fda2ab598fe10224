//! Order API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderQuery, OrderStatus, OrderStatusUpdate};
use shared::util::now_millis;

use crate::api::ApiResult;
use crate::auth::{MaybeRestaurant, RestaurantIdentity};
use crate::db;
use crate::db::orders::NewOrder;
use crate::error::ServiceError;
use crate::services::order_pricing::price_items;
use crate::state::AppState;

fn parse_status(value: &str) -> Result<OrderStatus, AppError> {
    OrderStatus::parse(value.trim()).ok_or_else(|| {
        AppError::new(ErrorCode::OrderStatusInvalid).with_detail("status", value.to_string())
    })
}

/// POST /api/order
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<MaybeRestaurant>,
    Json(payload): Json<OrderCreate>,
) -> Result<(StatusCode, Json<Order>), ServiceError> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).into());
    }
    payload.validate()?;

    let owner = db::orders::menu_owner(&state.pool, payload.menu_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;

    let mut dish_ids: Vec<i64> = payload.items.iter().map(|i| i.dish_id).collect();
    dish_ids.sort_unstable();
    dish_ids.dedup();
    let prices = db::dishes::prices_for_menu(&state.pool, payload.menu_id, &dish_ids).await?;
    let (items, total) = price_items(&payload.items, &prices)?;

    let new = NewOrder {
        menu_id: payload.menu_id,
        client: &payload.client,
        items: &items,
        notes: payload.notes.as_deref(),
        total,
    };
    let order = db::orders::create(&state.pool, &new, now_millis()).await?;

    tracing::info!(
        order_id = order.id,
        menu_id = order.menu_id,
        restaurant_id = owner,
        placed_by = ?caller.0.as_ref().map(|c| c.restaurant_id),
        total = %order.total,
        "Order placed"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/order
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Query(query): Query<OrderQuery>,
) -> ApiResult<Vec<Order>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let orders = db::orders::list(&state.pool, identity.restaurant_id, status, query.menu_id).await?;
    Ok(Json(orders))
}

/// GET /api/order/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let order = db::orders::find_owned(&state.pool, id, identity.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order))
}

/// PATCH /api/order/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let next = parse_status(&payload.status)?;

    let order = db::orders::find_owned(&state.pool, id, identity.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if order.status.is_terminal() {
        return Err(closed(&order).into());
    }

    // Guarded update: a concurrent close leaves zero rows affected
    if db::orders::update_status(&state.pool, id, next, now_millis()).await? == 0 {
        return Err(closed(&order).into());
    }
    tracing::info!(order_id = id, from = %order.status, to = %next, "Order status changed");

    let order = db::orders::find_owned(&state.pool, id, identity.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order))
}

fn closed(order: &Order) -> AppError {
    AppError::new(ErrorCode::OrderAlreadyClosed).with_detail("status", order.status.as_str())
}

/// DELETE /api/order/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    db::orders::find_owned(&state.pool, id, identity.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    db::orders::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
