//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error type every handler returns:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (field-level validation errors, context)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }
}

/// Field-level validation failures become one `ValidationFailed` error whose
/// details map each field path (`client.table_number`, `items[0].quantity`)
/// to its messages.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        flatten_validation(&errors, "", &mut fields);
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut err = AppError::new(ErrorCode::ValidationFailed);
        for (field, messages) in fields {
            err = err.with_detail(field, Value::Array(messages));
        }
        err
    }
}

fn flatten_validation(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<(String, Vec<Value>)>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                            .into()
                    })
                    .collect();
                out.push((path, messages));
            }
            ValidationErrorsKind::Struct(inner) => flatten_validation(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_validation(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// Error body returned by every failing endpoint
///
/// - `code`: numeric [`ErrorCode`]
/// - `message`: Human-readable message
/// - `details`: Additional error details (field errors, context)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::error(&self);

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::MenuNotFound);
        assert_eq!(err.code, ErrorCode::MenuNotFound);
        assert_eq!(err.message, "Menu not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::new(ErrorCode::OrderItemInvalid)
            .with_detail("dish_id", 12)
            .with_detail("reason", "not on menu");

        assert_eq!(err.code, ErrorCode::OrderItemInvalid);
        let details = err.details.unwrap();
        assert_eq!(details.get("dish_id").unwrap(), 12);
        assert_eq!(details.get("reason").unwrap(), "not on menu");
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::MenuNotFound).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::unauthorized().http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::token_expired().http_status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 7 not found");
        assert_eq!(format!("{}", err), "Order 7 not found");
    }

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email"))]
        email: String,
        #[validate(length(min = 8, message = "Too short"))]
        password: String,
    }

    #[test]
    fn test_from_validation_errors() {
        let input = Signup {
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details["email"], serde_json::json!(["Invalid email"]));
        assert_eq!(details["password"], serde_json::json!(["Too short"]));
    }

    #[derive(Validate)]
    struct Line {
        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: i32,
    }

    #[derive(Validate)]
    struct Basket {
        #[validate(nested)]
        lines: Vec<Line>,
    }

    #[test]
    fn test_nested_validation_paths() {
        let basket = Basket {
            lines: vec![Line { quantity: 1 }, Line { quantity: 0 }],
        };
        let err: AppError = basket.validate().unwrap_err().into();
        let details = err.details.unwrap();
        assert_eq!(
            details["lines[1].quantity"],
            serde_json::json!(["Quantity must be at least 1"])
        );
        assert_eq!(details.len(), 1);
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::with_message(ErrorCode::DishNotFound, "Dish not found")
            .with_detail("id", 12);
        let response = ApiResponse::error(&err);

        assert_eq!(response.code, 6201);
        assert_eq!(response.message, "Dish not found");
        assert!(response.details.is_some());
    }

    #[test]
    fn test_api_response_serialize() {
        let response = ApiResponse::error(&AppError::invalid_credentials());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], 1002);
        assert_eq!(json["message"], "Invalid email or password");
        assert!(json.get("details").is_none());
    }
}
