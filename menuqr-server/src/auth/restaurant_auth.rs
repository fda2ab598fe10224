//! Restaurant JWT authentication
//!
//! `require_auth` rejects requests without a valid bearer token;
//! `optional_auth` lets anonymous callers through and only attaches an
//! identity when a valid token is present.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::state::AppState;

/// JWT claims for restaurant authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct RestaurantClaims {
    /// Restaurant ID
    pub sub: String,
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated restaurant identity extracted from JWT
#[derive(Debug, Clone)]
pub struct RestaurantIdentity {
    pub restaurant_id: i64,
    pub email: String,
}

/// Identity attached by `optional_auth` (None for anonymous callers)
#[derive(Debug, Clone, Default)]
pub struct MaybeRestaurant(pub Option<RestaurantIdentity>);

/// Create a JWT token for a restaurant
pub fn create_token(
    restaurant_id: i64,
    email: &str,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = RestaurantClaims {
        sub: restaurant_id.to_string(),
        email: email.to_string(),
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify a token into an identity
pub fn verify_token(token: &str, secret: &str) -> Result<RestaurantIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<RestaurantClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    let restaurant_id = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::invalid_token("Invalid token subject"))?;

    Ok(RestaurantIdentity {
        restaurant_id,
        email: token_data.claims.email,
    })
}

/// `Some(token)` for `Bearer <token>`, `Err` for any other Authorization value,
/// `None` when the header is absent.
fn bearer_token(request: &Request) -> Result<Option<&str>, AppError> {
    let Some(value) = request.headers().get(http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::invalid_token("Invalid Authorization format"))?;
    value
        .strip_prefix("Bearer ")
        .map(|t| Some(t.trim()))
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))
}

/// Middleware that requires a valid restaurant JWT
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?.ok_or_else(AppError::unauthorized)?;
    let identity = verify_token(token, &state.jwt_secret)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Middleware that attaches an identity when a valid token is present.
/// Missing, malformed or expired tokens are treated as anonymous.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match bearer_token(&request) {
        Ok(Some(token)) => verify_token(token, &state.jwt_secret).ok(),
        _ => None,
    };

    request.extensions_mut().insert(MaybeRestaurant(identity));

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn token_round_trip() {
        let token = create_token(42, "chef@example.com", "secret", 24).unwrap();
        let identity = verify_token(&token, "secret").unwrap();
        assert_eq!(identity.restaurant_id, 42);
        assert_eq!(identity.email, "chef@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(42, "chef@example.com", "secret", 24).unwrap();
        let err = verify_token(&token, "other").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn expired_token_is_reported() {
        let token = create_token(42, "chef@example.com", "secret", -2).unwrap();
        let err = verify_token(&token, "secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("not.a.jwt", "secret").is_err());
    }
}
