//! Dish Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dish entity. A dish belongs to exactly one menu and one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub section_id: i64,
    pub menu_id: i64,
    pub created_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub images: Vec<DishImage>,
}

/// Dish image entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DishImage {
    pub id: i64,
    pub dish_id: i64,
    pub image_url: String,
    pub created_at: i64,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DishCreate {
    #[validate(length(min = 1, max = 120, message = "Dish name is required"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    pub price: Decimal,
    pub section_id: i64,
    pub menu_id: i64,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DishUpdate {
    #[validate(length(min = 1, max = 120, message = "Dish name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub section_id: Option<i64>,
}
