use chrono::NaiveDate;
use shared::models::Menu;
use sqlx::PgPool;

use crate::services::menu_resolver::TreeRow;

/// Dates come back in the same `YYYY-MM-DD` form the resolver compares against
const MENU_COLUMNS: &str =
    "id, restaurant_id, name, to_char(date, 'YYYY-MM-DD') AS date, created_at";

/// All candidate menus, newest first, optionally limited to one restaurant
pub async fn list_newest_first(
    pool: &PgPool,
    restaurant_id: Option<i64>,
) -> Result<Vec<Menu>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {MENU_COLUMNS} FROM menus
         WHERE ($1::BIGINT IS NULL OR restaurant_id = $1)
         ORDER BY date DESC, id DESC"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Menu>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {MENU_COLUMNS} FROM menus WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_owned(
    pool: &PgPool,
    id: i64,
    restaurant_id: i64,
) -> Result<Option<Menu>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {MENU_COLUMNS} FROM menus WHERE id = $1 AND restaurant_id = $2"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    restaurant_id: i64,
    name: &str,
    date: NaiveDate,
    now: i64,
) -> Result<Menu, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO menus (restaurant_id, name, date, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING {MENU_COLUMNS}"
    ))
    .bind(restaurant_id)
    .bind(name)
    .bind(date)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    restaurant_id: i64,
    name: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<Option<Menu>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE menus SET name = COALESCE($1, name), date = COALESCE($2, date)
         WHERE id = $3 AND restaurant_id = $4
         RETURNING {MENU_COLUMNS}"
    ))
    .bind(name)
    .bind(date)
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await
}

/// Dishes and their images go with the menu (ON DELETE CASCADE)
pub async fn delete(pool: &PgPool, id: i64, restaurant_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM menus WHERE id = $1 AND restaurant_id = $2")
        .bind(id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn has_orders(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM orders WHERE menu_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Every section of the restaurant, with the menu's dishes and their images.
///
/// Left joins keep empty sections and image-less dishes.
pub async fn tree_rows(
    pool: &PgPool,
    menu_id: i64,
    restaurant_id: i64,
) -> Result<Vec<TreeRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT s.id AS section_id, s.name AS section_name,
               d.id AS dish_id, d.name AS dish_name,
               d.description AS dish_description, d.price AS dish_price,
               di.id AS image_id, di.image_url
        FROM sections s
        LEFT JOIN dishes d ON d.section_id = s.id AND d.menu_id = $1
        LEFT JOIN dish_images di ON di.dish_id = d.id
        WHERE s.restaurant_id = $2
        ORDER BY s.name, d.name, di.id
        "#,
    )
    .bind(menu_id)
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}
