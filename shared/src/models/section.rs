//! Section Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Named grouping of dishes ("Starters", "Desserts", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Section {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub created_at: i64,
}

/// Create or rename payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SectionInput {
    #[validate(length(min = 1, max = 120, message = "Section name is required"))]
    pub name: String,
}
