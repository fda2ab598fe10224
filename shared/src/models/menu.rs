//! Menu Model
//!
//! A menu is a dated collection of dishes. Dates travel as `YYYY-MM-DD`
//! strings everywhere (DB reads go through `to_char`) so that "today's menu"
//! is a plain string comparison.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Date format used for menu dates and the server date
pub const MENU_DATE_FORMAT: &str = "%Y-%m-%d";

/// Menu entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Menu {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub created_at: i64,
}

/// Create menu payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuCreate {
    #[validate(length(min = 1, max = 120, message = "Menu name is required"))]
    pub name: String,
    pub date: String,
}

/// Update menu payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MenuUpdate {
    #[validate(length(min = 1, max = 120, message = "Menu name cannot be empty"))]
    pub name: Option<String>,
    pub date: Option<String>,
}

/// Parse a strict `YYYY-MM-DD` menu date.
pub fn parse_menu_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, MENU_DATE_FORMAT).ok()
}

// ── Nested menu tree ──

/// Dish as it appears inside a menu tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDish {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub images: Vec<String>,
}

/// Section with its dishes for one menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub id: i64,
    pub name: String,
    pub dishes: Vec<MenuDish>,
}

/// Which branch of current-menu resolution produced the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuMeta {
    pub is_todays_menu: bool,
    pub is_fallback: bool,
    pub server_date: String,
    pub menu_date: String,
}

/// Fully populated menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuTree {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub sections: Vec<MenuSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MenuMeta>,
}
