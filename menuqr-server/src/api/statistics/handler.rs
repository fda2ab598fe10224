use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{Days, Local, NaiveDate};

use shared::error::{AppError, ErrorCode};
use shared::models::{
    DailyOrders, DateRangeQuery, Overview, StatusCount, TopDish, TopDishesQuery, parse_menu_date,
};
use shared::util::local_today;

use crate::api::ApiResult;
use crate::auth::RestaurantIdentity;
use crate::db;
use crate::services::daily_stats::{bucket_by_day, day_start_millis};
use crate::state::AppState;

const DEFAULT_RANGE_DAYS: u64 = 30;
const DEFAULT_TOP_DISHES: i64 = 10;
const MAX_TOP_DISHES: i64 = 50;

/// GET /api/statistics/overview
pub async fn overview(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
) -> ApiResult<Overview> {
    Ok(Json(
        db::statistics::overview(&state.pool, identity.restaurant_id).await?,
    ))
}

/// GET /api/statistics/orders-by-status
pub async fn orders_by_status(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
) -> ApiResult<Vec<StatusCount>> {
    Ok(Json(
        db::statistics::orders_by_status(&state.pool, identity.restaurant_id).await?,
    ))
}

fn parse_day(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|v| {
            parse_menu_date(v.trim()).ok_or_else(|| {
                AppError::with_message(ErrorCode::InvalidFormat, "Dates must be YYYY-MM-DD")
                    .with_detail("field", field)
            })
        })
        .transpose()
}

/// Inclusive day range; defaults to the last 30 days ending today
fn resolve_range(query: &DateRangeQuery, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
    let to = parse_day("to", query.to.as_deref())?.unwrap_or(today);
    let from = match parse_day("from", query.from.as_deref())? {
        Some(from) => from,
        None => to
            .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS - 1))
            .unwrap_or(to),
    };
    if from > to {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "`from` must not be after `to`",
        ));
    }
    Ok((from, to))
}

/// GET /api/statistics/orders-by-day
pub async fn orders_by_day(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Vec<DailyOrders>> {
    let (from, to) = resolve_range(&query, local_today())?;
    let end = to.checked_add_days(Days::new(1)).unwrap_or(to);

    let stamps = db::statistics::orders_in_range(
        &state.pool,
        identity.restaurant_id,
        day_start_millis(from, &Local),
        day_start_millis(end, &Local),
    )
    .await?;
    Ok(Json(bucket_by_day(&stamps, &Local)))
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_TOP_DISHES).clamp(1, MAX_TOP_DISHES)
}

/// GET /api/statistics/top-dishes
pub async fn top_dishes(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
    Query(query): Query<TopDishesQuery>,
) -> ApiResult<Vec<TopDish>> {
    let rows = db::statistics::top_dishes(
        &state.pool,
        identity.restaurant_id,
        clamp_limit(query.limit),
    )
    .await?;
    Ok(Json(rows))
}
