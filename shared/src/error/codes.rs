//! Unified error codes for MenuQR
//!
//! Error codes are shared by the server and the SPA. They are organized by
//! range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Restaurant account errors
//! - 4xxx: Order errors
//! - 6xxx: Menu catalog errors (65xx: file upload)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the frontend can switch on plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Rate limit hit
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// No or unusable credentials on a protected route
    NotAuthenticated = 1001,
    /// Unknown email or wrong password (deliberately indistinguishable)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Password reset token unknown
    ResetTokenInvalid = 1005,
    /// Password reset token past its expiry
    ResetTokenExpired = 1006,
    /// Password too short
    PasswordTooShort = 1007,

    // ==================== 3xxx: Restaurant ====================
    RestaurantNotFound = 3001,
    EmailAlreadyRegistered = 3002,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderEmpty = 4002,
    OrderStatusInvalid = 4003,
    /// Order is delivered or cancelled
    OrderAlreadyClosed = 4004,
    OrderItemInvalid = 4005,

    // ==================== 6xxx: Menu catalog ====================
    MenuNotFound = 6001,
    MenuHasOrders = 6002,
    MenuDateInvalid = 6003,
    SectionNotFound = 6101,
    SectionNameExists = 6102,
    DishNotFound = 6201,
    DishInvalidPrice = 6202,
    DishImageNotFound = 6203,

    // ==================== 65xx: File Upload ====================
    FileTooLarge = 6501,
    UnsupportedFileFormat = 6502,
    InvalidImageFile = 6503,
    NoFileProvided = 6504,
    EmptyFile = 6505,
    ImageProcessingFailed = 6508,
    ImageUploadFailed = 6509,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::ResetTokenInvalid => "Invalid or expired reset token",
            ErrorCode::ResetTokenExpired => "Reset token has expired",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderStatusInvalid => "Invalid order status",
            ErrorCode::OrderAlreadyClosed => "Order is already delivered or cancelled",
            ErrorCode::OrderItemInvalid => "Order item is invalid",

            // Menu catalog
            ErrorCode::MenuNotFound => "Menu not found",
            ErrorCode::MenuHasOrders => "Menu is referenced by orders",
            ErrorCode::MenuDateInvalid => "Invalid menu date, expected YYYY-MM-DD",
            ErrorCode::SectionNotFound => "Section not found",
            ErrorCode::SectionNameExists => "Section name already exists",
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::DishInvalidPrice => "Dish price must be zero or positive",
            ErrorCode::DishImageNotFound => "Dish image not found",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::ImageUploadFailed => "Image upload failed",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::ResetTokenInvalid),
            1006 => Ok(ErrorCode::ResetTokenExpired),
            1007 => Ok(ErrorCode::PasswordTooShort),

            // Restaurant
            3001 => Ok(ErrorCode::RestaurantNotFound),
            3002 => Ok(ErrorCode::EmailAlreadyRegistered),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderStatusInvalid),
            4004 => Ok(ErrorCode::OrderAlreadyClosed),
            4005 => Ok(ErrorCode::OrderItemInvalid),

            // Menu catalog
            6001 => Ok(ErrorCode::MenuNotFound),
            6002 => Ok(ErrorCode::MenuHasOrders),
            6003 => Ok(ErrorCode::MenuDateInvalid),
            6101 => Ok(ErrorCode::SectionNotFound),
            6102 => Ok(ErrorCode::SectionNameExists),
            6201 => Ok(ErrorCode::DishNotFound),
            6202 => Ok(ErrorCode::DishInvalidPrice),
            6203 => Ok(ErrorCode::DishImageNotFound),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::ImageUploadFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::ValueOutOfRange.code(), 8);
        assert_eq!(ErrorCode::TooManyRequests.code(), 9);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::ResetTokenExpired.code(), 1006);

        assert_eq!(ErrorCode::EmailAlreadyRegistered.code(), 3002);
        assert_eq!(ErrorCode::OrderAlreadyClosed.code(), 4004);

        assert_eq!(ErrorCode::MenuNotFound.code(), 6001);
        assert_eq!(ErrorCode::SectionNotFound.code(), 6101);
        assert_eq!(ErrorCode::DishNotFound.code(), 6201);
        assert_eq!(ErrorCode::FileTooLarge.code(), 6501);

        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_matches_discriminant() {
        let codes = [
            ErrorCode::ValidationFailed,
            ErrorCode::TooManyRequests,
            ErrorCode::InvalidCredentials,
            ErrorCode::ResetTokenInvalid,
            ErrorCode::RestaurantNotFound,
            ErrorCode::OrderItemInvalid,
            ErrorCode::MenuDateInvalid,
            ErrorCode::DishImageNotFound,
            ErrorCode::ImageUploadFailed,
            ErrorCode::InternalError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(3), Err(InvalidErrorCode(3)));
        assert_eq!(ErrorCode::try_from(5001), Err(InvalidErrorCode(5001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::ValidationFailed).unwrap(), "2");
        assert_eq!(serde_json::to_string(&ErrorCode::MenuNotFound).unwrap(), "6001");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);

        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::TooManyRequests), "9");
        assert_eq!(format!("{}", ErrorCode::DishNotFound), "6201");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::MenuNotFound.message(), "Menu not found");
        assert_eq!(
            ErrorCode::InvalidCredentials.message(),
            "Invalid email or password"
        );
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
