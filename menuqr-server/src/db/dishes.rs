use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::{Dish, DishCreate, DishImage, DishUpdate};
use sqlx::PgPool;

const DISH_COLUMNS: &str =
    "d.id, d.name, d.description, d.price, d.section_id, d.menu_id, d.created_at";

/// Dishes of the owner's menus, optionally filtered, with images attached
pub async fn list(
    pool: &PgPool,
    restaurant_id: i64,
    menu_id: Option<i64>,
    section_id: Option<i64>,
) -> Result<Vec<Dish>, sqlx::Error> {
    let mut dishes: Vec<Dish> = sqlx::query_as(&format!(
        "SELECT {DISH_COLUMNS} FROM dishes d
         JOIN menus m ON m.id = d.menu_id
         WHERE m.restaurant_id = $1
           AND ($2::BIGINT IS NULL OR d.menu_id = $2)
           AND ($3::BIGINT IS NULL OR d.section_id = $3)
         ORDER BY d.name, d.id"
    ))
    .bind(restaurant_id)
    .bind(menu_id)
    .bind(section_id)
    .fetch_all(pool)
    .await?;

    attach_images(pool, &mut dishes).await?;
    Ok(dishes)
}

/// Dish whose menu belongs to `restaurant_id`, with images attached
pub async fn find_owned(
    pool: &PgPool,
    id: i64,
    restaurant_id: i64,
) -> Result<Option<Dish>, sqlx::Error> {
    let dish: Option<Dish> = sqlx::query_as(&format!(
        "SELECT {DISH_COLUMNS} FROM dishes d
         JOIN menus m ON m.id = d.menu_id
         WHERE d.id = $1 AND m.restaurant_id = $2"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;

    let Some(dish) = dish else {
        return Ok(None);
    };
    let mut dishes = vec![dish];
    attach_images(pool, &mut dishes).await?;
    Ok(dishes.pop())
}

async fn attach_images(pool: &PgPool, dishes: &mut [Dish]) -> Result<(), sqlx::Error> {
    if dishes.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = dishes.iter().map(|d| d.id).collect();
    let images: Vec<DishImage> = sqlx::query_as(
        "SELECT id, dish_id, image_url, created_at FROM dish_images
         WHERE dish_id = ANY($1) ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_dish: HashMap<i64, Vec<DishImage>> = HashMap::new();
    for image in images {
        by_dish.entry(image.dish_id).or_default().push(image);
    }
    for dish in dishes.iter_mut() {
        dish.images = by_dish.remove(&dish.id).unwrap_or_default();
    }
    Ok(())
}

pub async fn create(pool: &PgPool, data: &DishCreate, now: i64) -> Result<Dish, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO dishes (name, description, price, section_id, menu_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, name, description, price, section_id, menu_id, created_at",
    )
    .bind(data.name.trim())
    .bind(data.description.as_deref())
    .bind(data.price)
    .bind(data.section_id)
    .bind(data.menu_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Caller has already checked ownership of the dish and of any new section
pub async fn update(pool: &PgPool, id: i64, data: &DishUpdate) -> Result<Option<Dish>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE dishes SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            section_id = COALESCE($4, section_id)
         WHERE id = $5
         RETURNING id, name, description, price, section_id, menu_id, created_at",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.description.as_deref())
    .bind(data.price)
    .bind(data.section_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM dishes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn add_image(
    pool: &PgPool,
    dish_id: i64,
    image_url: &str,
    now: i64,
) -> Result<DishImage, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO dish_images (dish_id, image_url, created_at) VALUES ($1, $2, $3)
         RETURNING id, dish_id, image_url, created_at",
    )
    .bind(dish_id)
    .bind(image_url)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn delete_image(pool: &PgPool, dish_id: i64, image_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM dish_images WHERE id = $1 AND dish_id = $2")
        .bind(image_id)
        .bind(dish_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Name and current price of the given dishes, restricted to one menu
pub async fn prices_for_menu(
    pool: &PgPool,
    menu_id: i64,
    dish_ids: &[i64],
) -> Result<HashMap<i64, (String, Decimal)>, sqlx::Error> {
    let rows: Vec<(i64, String, Decimal)> = sqlx::query_as(
        "SELECT id, name, price FROM dishes WHERE menu_id = $1 AND id = ANY($2)",
    )
    .bind(menu_id)
    .bind(dish_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(id, name, price)| (id, (name, price)))
        .collect())
}
