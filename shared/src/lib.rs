//! Shared types for MenuQR
//!
//! Error codes and response envelopes, domain models and request DTOs, and
//! small time helpers used by the server and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
