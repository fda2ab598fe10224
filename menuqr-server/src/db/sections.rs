use shared::models::Section;
use sqlx::PgPool;

pub async fn list(pool: &PgPool, restaurant_id: i64) -> Result<Vec<Section>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, restaurant_id, name, created_at FROM sections
         WHERE restaurant_id = $1 ORDER BY name, id",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

pub async fn find_owned(
    pool: &PgPool,
    id: i64,
    restaurant_id: i64,
) -> Result<Option<Section>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, restaurant_id, name, created_at FROM sections
         WHERE id = $1 AND restaurant_id = $2",
    )
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    restaurant_id: i64,
    name: &str,
    now: i64,
) -> Result<Section, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO sections (restaurant_id, name, created_at) VALUES ($1, $2, $3)
         RETURNING id, restaurant_id, name, created_at",
    )
    .bind(restaurant_id)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn rename(
    pool: &PgPool,
    id: i64,
    restaurant_id: i64,
    name: &str,
) -> Result<Option<Section>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE sections SET name = $1 WHERE id = $2 AND restaurant_id = $3
         RETURNING id, restaurant_id, name, created_at",
    )
    .bind(name)
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await
}

/// Dishes in the section go with it (ON DELETE CASCADE)
pub async fn delete(pool: &PgPool, id: i64, restaurant_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sections WHERE id = $1 AND restaurant_id = $2")
        .bind(id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
