//! Restaurant Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Restaurant profile as returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: i64,
}

/// Restaurant info shown on the public QR landing page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantPublic {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

/// POST /api/auth/register
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120, message = "Restaurant name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(max = 40, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Address is too long"))]
    pub address: Option<String>,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token issued by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub restaurant: RestaurantProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResetTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResetTokenResponse {
    pub valid: bool,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// POST /api/restaurant/profile (absent fields are left untouched)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RestaurantUpdate {
    #[validate(length(min = 1, max = 120, message = "Restaurant name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 40, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Address is too long"))]
    pub address: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoUploadResponse {
    pub logo_url: String,
}
