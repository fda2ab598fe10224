//! Domain logic that does not touch the database directly

pub mod daily_stats;
pub mod menu_resolver;
pub mod order_pricing;
