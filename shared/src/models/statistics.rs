//! Owner dashboard statistics

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Overview {
    pub total_menus: i64,
    pub total_sections: i64,
    pub total_dishes: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    /// Excludes cancelled orders
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOrders {
    /// `YYYY-MM-DD`
    pub date: String,
    pub orders: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopDish {
    pub dish_id: i64,
    pub name: String,
    pub quantity: i64,
    pub revenue: Decimal,
}

/// `?from=&to=` range for daily stats
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// `?limit=` for top dishes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopDishesQuery {
    pub limit: Option<i64>,
}
