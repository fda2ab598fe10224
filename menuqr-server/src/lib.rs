//! menuqr-server: restaurant digital-menu backend
//!
//! Restaurants register and manage dated menus, sections and dishes;
//! customers scan a QR code to view the current menu and place orders.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;
pub mod storage;
pub mod util;

pub use config::Config;
pub use state::AppState;
