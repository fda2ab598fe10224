//! Read-only aggregates for the owner dashboard. Revenue never counts
//! cancelled orders.

use shared::models::{Overview, StatusCount, TopDish};
use sqlx::PgPool;

use crate::services::daily_stats::OrderStamp;

pub async fn overview(pool: &PgPool, restaurant_id: i64) -> Result<Overview, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM menus WHERE restaurant_id = $1) AS total_menus,
            (SELECT COUNT(*) FROM sections WHERE restaurant_id = $1) AS total_sections,
            (SELECT COUNT(*) FROM dishes d JOIN menus m ON m.id = d.menu_id
              WHERE m.restaurant_id = $1) AS total_dishes,
            (SELECT COUNT(*) FROM orders o JOIN menus m ON m.id = o.menu_id
              WHERE m.restaurant_id = $1) AS total_orders,
            (SELECT COUNT(*) FROM orders o JOIN menus m ON m.id = o.menu_id
              WHERE m.restaurant_id = $1 AND o.status = 'pending') AS pending_orders,
            (SELECT COALESCE(SUM(o.total), 0)::NUMERIC FROM orders o JOIN menus m ON m.id = o.menu_id
              WHERE m.restaurant_id = $1 AND o.status <> 'cancelled') AS total_revenue
        "#,
    )
    .bind(restaurant_id)
    .fetch_one(pool)
    .await
}

pub async fn orders_by_status(
    pool: &PgPool,
    restaurant_id: i64,
) -> Result<Vec<StatusCount>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT o.status, COUNT(*) AS count
        FROM orders o
        JOIN menus m ON m.id = o.menu_id
        WHERE m.restaurant_id = $1
        GROUP BY o.status
        ORDER BY o.status
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

/// Orders of the owner's menus created in `[from_ms, to_ms)`, for day bucketing
pub async fn orders_in_range(
    pool: &PgPool,
    restaurant_id: i64,
    from_ms: i64,
    to_ms: i64,
) -> Result<Vec<OrderStamp>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT o.created_at, o.total, o.status
        FROM orders o
        JOIN menus m ON m.id = o.menu_id
        WHERE m.restaurant_id = $1 AND o.created_at >= $2 AND o.created_at < $3
        ORDER BY o.created_at
        "#,
    )
    .bind(restaurant_id)
    .bind(from_ms)
    .bind(to_ms)
    .fetch_all(pool)
    .await
}

/// Best sellers by quantity, from the order line snapshots
pub async fn top_dishes(
    pool: &PgPool,
    restaurant_id: i64,
    limit: i64,
) -> Result<Vec<TopDish>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT (item->>'dish_id')::BIGINT AS dish_id,
               MAX(item->>'name') AS name,
               SUM((item->>'quantity')::BIGINT)::BIGINT AS quantity,
               SUM((item->>'line_total')::NUMERIC) AS revenue
        FROM orders o
        JOIN menus m ON m.id = o.menu_id
        CROSS JOIN LATERAL jsonb_array_elements(o.items) AS item
        WHERE m.restaurant_id = $1 AND o.status <> 'cancelled'
        GROUP BY 1
        ORDER BY quantity DESC, revenue DESC, dish_id
        LIMIT $2
        "#,
    )
    .bind(restaurant_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
