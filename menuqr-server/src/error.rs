//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so handlers propagate with `?` instead of
//! mapping every query failure by hand.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(e: validator::ValidationErrors) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                internal_error(&db_err)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Generic 500; debug builds carry the raw driver message in `details.error`.
pub fn internal_error(err: impl std::fmt::Display) -> AppError {
    let app_err = AppError::new(ErrorCode::InternalError);
    if cfg!(debug_assertions) {
        app_err.with_detail("error", err.to_string())
    } else {
        app_err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_errors_pass_through() {
        let err: AppError = ServiceError::App(AppError::new(ErrorCode::MenuNotFound)).into();
        assert_eq!(err.code, ErrorCode::MenuNotFound);
    }

    #[test]
    fn db_errors_become_internal() {
        let err: AppError = ServiceError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        if cfg!(debug_assertions) {
            assert!(err.details.unwrap().contains_key("error"));
        }
    }
}
