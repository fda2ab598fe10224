//! Account API Handlers

use std::sync::LazyLock;

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::json;
use validator::Validate;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    RestaurantProfile, VerifyResetTokenRequest, VerifyResetTokenResponse,
};

use crate::api::ApiResult;
use crate::auth::RestaurantIdentity;
use crate::auth::restaurant_auth::create_token;
use crate::db;
use crate::db::restaurants::{NewRestaurant, Restaurant};
use crate::error::{ServiceError, internal_error};
use crate::state::AppState;
use crate::util::{
    generate_reset_token, hash_password, normalize_email, now_millis, sha256_hex, verify_password,
};

/// Reset links stay valid for one hour
const RESET_TOKEN_TTL_MS: i64 = 60 * 60 * 1000;

const MIN_PASSWORD_LEN: usize = 8;

const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for this email, a password reset link has been sent";

/// Hash checked in place of a real one when the login email is unknown
static DUMMY_PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("menuqr-unknown-account").unwrap_or_default());

fn issue_token(state: &AppState, id: i64, email: &str) -> Result<String, AppError> {
    create_token(id, email, &state.jwt_secret, state.jwt_expiry_hours).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        internal_error(e)
    })
}

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        internal_error(e)
    })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServiceError> {
    req.validate()?;

    let email = normalize_email(&req.email);
    let hashed = hash(&req.password)?;
    let new = NewRestaurant {
        name: req.name.trim(),
        email: &email,
        hashed_password: &hashed,
        phone: req.phone.as_deref(),
        address: req.address.as_deref(),
    };

    let restaurant = match db::restaurants::create(&state.pool, &new, now_millis()).await {
        Ok(r) => r,
        Err(e) if db::is_unique_violation(&e) => {
            return Err(AppError::new(ErrorCode::EmailAlreadyRegistered).into());
        }
        Err(e) => return Err(e.into()),
    };

    let token = issue_token(&state, restaurant.id, &restaurant.email)?;
    tracing::info!(restaurant_id = restaurant.id, "Restaurant registered");

    let mailer = state.mailer.clone();
    let (to, name) = (restaurant.email.clone(), restaurant.name.clone());
    tokio::spawn(async move {
        if let Err(e) = mailer.send_welcome(&to, &name).await {
            tracing::warn!(to = %to, error = %e, "Welcome email failed");
        }
    });

    Ok((StatusCode::CREATED, Json(AuthResponse { token, restaurant })))
}

/// Check a password against the account found for the login email.
///
/// Unknown email and wrong password fail with the same error.
fn authenticate(account: Option<&Restaurant>, password: &str) -> Result<i64, AppError> {
    let hash = account.map_or(DUMMY_PASSWORD_HASH.as_str(), |a| a.hashed_password.as_str());
    let verified = verify_password(password, hash);
    match account {
        Some(a) if verified => Ok(a.id),
        Some(a) => {
            tracing::debug!(restaurant_id = a.id, "Login rejected: wrong password");
            Err(AppError::invalid_credentials())
        }
        None => Err(AppError::invalid_credentials()),
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = normalize_email(&req.email);
    let account = db::restaurants::find_by_email(&state.pool, &email).await?;
    let restaurant_id = authenticate(account.as_ref(), &req.password)?;

    let restaurant = db::restaurants::find_profile(&state.pool, restaurant_id)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;
    let token = issue_token(&state, restaurant.id, &restaurant.email)?;

    Ok(Json(AuthResponse { token, restaurant }))
}

/// POST /api/auth/forgot-password
///
/// Always answers with the same message so account existence is not revealed.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let email = normalize_email(&req.email);
    let response = Json(json!({ "message": FORGOT_PASSWORD_MESSAGE }));

    let Some(account) = db::restaurants::find_by_email(&state.pool, &email).await? else {
        return Ok(response);
    };

    let token = generate_reset_token();
    let expires_at = now_millis() + RESET_TOKEN_TTL_MS;
    db::restaurants::set_reset_token(&state.pool, account.id, &sha256_hex(&token), expires_at)
        .await?;

    match state.mailer.send_password_reset(&account.email, &token).await {
        Ok(()) => tracing::info!(restaurant_id = account.id, "Password reset link issued"),
        Err(e) => {
            tracing::error!(restaurant_id = account.id, error = %e, "Password reset email failed")
        }
    }
    Ok(response)
}

/// Resolve a raw reset token to its account, rejecting unknown or expired tokens
async fn account_for_reset_token(state: &AppState, token: &str) -> Result<Restaurant, ServiceError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::new(ErrorCode::ResetTokenInvalid).into());
    }

    let account = db::restaurants::find_by_reset_token(&state.pool, &sha256_hex(token))
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ResetTokenInvalid))?;

    check_reset_expiry(account.reset_token_expiry, now_millis())?;
    Ok(account)
}

/// A reset token is usable strictly before its expiry
fn check_reset_expiry(expiry: Option<i64>, now: i64) -> Result<(), AppError> {
    match expiry {
        Some(expiry) if expiry > now => Ok(()),
        _ => Err(AppError::new(ErrorCode::ResetTokenExpired)),
    }
}

/// POST /api/auth/verify-reset-token
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Json(req): Json<VerifyResetTokenRequest>,
) -> ApiResult<VerifyResetTokenResponse> {
    let account = account_for_reset_token(&state, &req.token).await?;
    Ok(Json(VerifyResetTokenResponse {
        valid: true,
        email: account.email,
    }))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort).into());
    }
    let account = account_for_reset_token(&state, &req.token).await?;

    let hashed = hash(&req.password)?;
    db::restaurants::reset_password(&state.pool, account.id, &hashed).await?;
    tracing::info!(restaurant_id = account.id, "Password reset completed");

    let mailer = state.mailer.clone();
    let to = account.email;
    tokio::spawn(async move {
        if let Err(e) = mailer.send_password_changed(&to).await {
            tracing::warn!(to = %to, error = %e, "Password change confirmation failed");
        }
    });

    Ok(Json(json!({ "message": "Password has been reset successfully" })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<RestaurantIdentity>,
) -> ApiResult<RestaurantProfile> {
    let profile = db::restaurants::find_profile(&state.pool, identity.restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(password: &str) -> Restaurant {
        Restaurant {
            id: 7,
            name: "Bistro".into(),
            email: "owner@bistro.test".into(),
            hashed_password: hash_password(password).unwrap(),
            reset_token_expiry: None,
        }
    }

    #[test]
    fn reset_expiry_boundaries() {
        let now = 1_750_000_000_000;
        assert!(check_reset_expiry(Some(now + 1), now).is_ok());

        for expiry in [Some(now - 1), Some(now), None] {
            let err = check_reset_expiry(expiry, now).unwrap_err();
            assert_eq!(err.code, ErrorCode::ResetTokenExpired);
            assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn reset_ttl_is_one_hour() {
        let issued = 1_750_000_000_000;
        let expiry = issued + RESET_TOKEN_TTL_MS;
        assert!(check_reset_expiry(Some(expiry), issued + 59 * 60 * 1000).is_ok());
        assert!(check_reset_expiry(Some(expiry), issued + 61 * 60 * 1000).is_err());
    }

    #[test]
    fn correct_password_authenticates() {
        let owner = account("correct horse");
        assert_eq!(authenticate(Some(&owner), "correct horse").unwrap(), 7);
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let owner = account("correct horse");
        let wrong_password = authenticate(Some(&owner), "battery staple").unwrap_err();
        let unknown_email = authenticate(None, "correct horse").unwrap_err();

        assert_eq!(wrong_password.code, ErrorCode::InvalidCredentials);
        assert_eq!(
            (wrong_password.http_status(), wrong_password.code, &wrong_password.message),
            (unknown_email.http_status(), unknown_email.code, &unknown_email.message)
        );
        assert_eq!(wrong_password.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.message, "Invalid email or password");
    }

    #[test]
    fn unknown_email_runs_a_real_verification() {
        assert!(DUMMY_PASSWORD_HASH.starts_with("$argon2"));
    }
}
