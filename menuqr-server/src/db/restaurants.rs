use shared::models::{RestaurantProfile, RestaurantPublic, RestaurantUpdate};
use sqlx::PgPool;

/// Full account row, including credentials
#[derive(sqlx::FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub reset_token_expiry: Option<i64>,
}

const PROFILE_COLUMNS: &str =
    "id, name, email, phone, address, description, logo_url, created_at";

pub struct NewRestaurant<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub hashed_password: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
}

pub async fn create(
    pool: &PgPool,
    new: &NewRestaurant<'_>,
    now: i64,
) -> Result<RestaurantProfile, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO restaurants (name, email, hashed_password, phone, address, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(new.name)
    .bind(new.email)
    .bind(new.hashed_password)
    .bind(new.phone)
    .bind(new.address)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, email, hashed_password, reset_token_expiry
         FROM restaurants WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn find_profile(pool: &PgPool, id: i64) -> Result<Option<RestaurantProfile>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {PROFILE_COLUMNS} FROM restaurants WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_public(pool: &PgPool, id: i64) -> Result<Option<RestaurantPublic>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, phone, address, description, logo_url
         FROM restaurants WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Update provided fields only
pub async fn update_profile(
    pool: &PgPool,
    id: i64,
    data: &RestaurantUpdate,
) -> Result<Option<RestaurantProfile>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE restaurants SET
            name = COALESCE($1, name),
            phone = COALESCE($2, phone),
            address = COALESCE($3, address),
            description = COALESCE($4, description)
         WHERE id = $5
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.phone.as_deref())
    .bind(data.address.as_deref())
    .bind(data.description.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update_logo(pool: &PgPool, id: i64, logo_url: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE restaurants SET logo_url = $1 WHERE id = $2")
        .bind(logo_url)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_reset_token(
    pool: &PgPool,
    id: i64,
    token_hash: &str,
    expires_at: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE restaurants SET reset_token_hash = $1, reset_token_expiry = $2 WHERE id = $3",
    )
    .bind(token_hash)
    .bind(expires_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_reset_token(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, email, hashed_password, reset_token_expiry
         FROM restaurants WHERE reset_token_hash = $1",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
}

/// Set a new password and clear any outstanding reset token
pub async fn reset_password(
    pool: &PgPool,
    id: i64,
    hashed_password: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE restaurants
         SET hashed_password = $1, reset_token_hash = NULL, reset_token_expiry = NULL
         WHERE id = $2",
    )
    .bind(hashed_password)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
