//! Menu API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use shared::error::{AppError, ErrorCode};
use shared::models::{Menu, MenuCreate, MenuTree, MenuUpdate, parse_menu_date};
use shared::util::{format_date, local_today};

use crate::api::ApiResult;
use crate::auth::RestaurantIdentity;
use crate::db;
use crate::error::ServiceError;
use crate::services::menu_resolver::{build_tree, select_current_menu};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CurrentMenuQuery {
    pub restaurant_id: Option<i64>,
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    parse_menu_date(value.trim()).ok_or_else(|| {
        AppError::new(ErrorCode::MenuDateInvalid).with_detail("date", value.to_string())
    })
}

/// GET /api/menu/current
///
/// Today's menu if one exists, otherwise the newest one.
pub async fn current(
    State(state): State<AppState>,
    Query(query): Query<CurrentMenuQuery>,
) -> ApiResult<MenuTree> {
    let today = format_date(local_today());
    let menus = db::menus::list_newest_first(&state.pool, query.restaurant_id).await?;

    let selection = select_current_menu(&menus, &today)
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;
    if selection.is_fallback {
        tracing::debug!(
            server_date = %today,
            menu_id = selection.menu.id,
            "No menu for today, serving newest"
        );
    }

    let rows = db::menus::tree_rows(
        &state.pool,
        selection.menu.id,
        selection.menu.restaurant_id,
    )
    .await?;
    let meta = selection.meta(&today);

    Ok(Json(build_tree(selection.menu, &rows, Some(meta))))
}

/// GET /api/menu/{id}
pub async fn get_tree(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<MenuTree> {
    let menu = db::menus::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;
    let rows = db::menus::tree_rows(&state.pool, menu.id, menu.restaurant_id).await?;
    Ok(Json(build_tree(&menu, &rows, None)))
}

/// GET /api/menu
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
) -> ApiResult<Vec<Menu>> {
    let menus = db::menus::list_newest_first(&state.pool, Some(identity.restaurant_id)).await?;
    Ok(Json(menus))
}

/// POST /api/menu
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Json(payload): Json<MenuCreate>,
) -> Result<(StatusCode, Json<Menu>), ServiceError> {
    payload.validate()?;
    let date = parse_date(&payload.date)?;

    let menu = db::menus::create(
        &state.pool,
        identity.restaurant_id,
        payload.name.trim(),
        date,
        shared::util::now_millis(),
    )
    .await?;
    tracing::info!(menu_id = menu.id, date = %menu.date, "Menu created");

    Ok((StatusCode::CREATED, Json(menu)))
}

/// PUT /api/menu/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuUpdate>,
) -> ApiResult<Menu> {
    payload.validate()?;
    let date = payload.date.as_deref().map(parse_date).transpose()?;

    let menu = db::menus::update(
        &state.pool,
        id,
        identity.restaurant_id,
        payload.name.as_deref().map(str::trim),
        date,
    )
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;
    Ok(Json(menu))
}

/// DELETE /api/menu/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    db::menus::find_owned(&state.pool, id, identity.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;

    if db::menus::has_orders(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::MenuHasOrders).into());
    }

    match db::menus::delete(&state.pool, id, identity.restaurant_id).await {
        Ok(0) => Err(AppError::new(ErrorCode::MenuNotFound).into()),
        Ok(_) => {
            tracing::info!(menu_id = id, "Menu deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        // An order placed between the check and the delete
        Err(e) if db::is_foreign_key_violation(&e) => {
            Err(AppError::new(ErrorCode::MenuHasOrders).into())
        }
        Err(e) => Err(e.into()),
    }
}
