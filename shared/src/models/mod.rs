//! Data models
//!
//! Shared between the server and the SPA (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL).

pub mod dish;
pub mod menu;
pub mod order;
pub mod restaurant;
pub mod section;
pub mod statistics;

// Re-exports
pub use dish::*;
pub use menu::*;
pub use order::*;
pub use restaurant::*;
pub use section::*;
pub use statistics::*;
