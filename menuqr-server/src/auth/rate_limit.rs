//! Per-IP fixed-window limits on the unauthenticated account routes

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

/// Budget of one route: `max_hits` requests per `window` per client IP
#[derive(Debug, Clone, Copy)]
pub struct RouteLimit {
    pub route: &'static str,
    pub max_hits: u32,
    pub window: Duration,
}

pub const LOGIN_LIMIT: RouteLimit = RouteLimit {
    route: "login",
    max_hits: 5,
    window: Duration::from_secs(60),
};

pub const REGISTER_LIMIT: RouteLimit = RouteLimit {
    route: "register",
    max_hits: 3,
    window: Duration::from_secs(60),
};

/// Windows idle longer than this are dropped by [`RateLimiter::cleanup`]
const STALE_AFTER: Duration = Duration::from_secs(300);

struct Window {
    hits: u32,
    opened: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<(&'static str, String), Window>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one hit. `Err` carries how long until the window reopens.
    async fn hit(&self, limit: RouteLimit, ip: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let window = windows
            .entry((limit.route, ip.to_owned()))
            .or_insert(Window { hits: 0, opened: now });

        let age = now.duration_since(window.opened);
        if age >= limit.window {
            *window = Window { hits: 0, opened: now };
        }

        window.hits += 1;
        if window.hits > limit.max_hits {
            Err(limit.window.saturating_sub(now.duration_since(window.opened)))
        } else {
            Ok(())
        }
    }

    /// Forget windows opened more than five minutes ago
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.opened) < STALE_AFTER);
        let dropped = before - windows.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Rate limiter windows pruned");
        }
    }
}

/// First `X-Forwarded-For` hop when behind a proxy, else the socket peer
fn client_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match forwarded {
        Some(ip) => ip.to_owned(),
        None => request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_owned()),
    }
}

fn rejected(limit: RouteLimit, ip: &str, retry_after: Duration) -> Response {
    // Round up so clients never retry a moment too early
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    tracing::warn!(route = limit.route, ip, retry_after_secs = secs, "Rate limit exceeded");

    let mut response = AppError::new(ErrorCode::TooManyRequests)
        .with_detail("retry_after_secs", secs)
        .into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
    response
}

async fn enforce(limit: RouteLimit, state: &AppState, request: Request, next: Next) -> Response {
    let ip = client_ip(&request);
    match state.rate_limiter.hit(limit, &ip).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => rejected(limit, &ip, retry_after),
    }
}

pub async fn login_rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    enforce(LOGIN_LIMIT, &state, request, next).await
}

pub async fn register_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    enforce(REGISTER_LIMIT, &state, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    const TIGHT: RouteLimit = RouteLimit {
        route: "test",
        max_hits: 1,
        window: Duration::from_secs(60),
    };

    #[tokio::test]
    async fn register_budget_is_per_ip_and_route() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.hit(REGISTER_LIMIT, "10.0.0.1").await.is_ok());
        }
        assert!(limiter.hit(REGISTER_LIMIT, "10.0.0.1").await.is_err());
        assert!(limiter.hit(REGISTER_LIMIT, "10.0.0.2").await.is_ok());
        assert!(limiter.hit(LOGIN_LIMIT, "10.0.0.1").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_counts_down_and_window_reopens() {
        let limiter = RateLimiter::new();
        assert!(limiter.hit(TIGHT, "ip").await.is_ok());

        tokio::time::advance(Duration::from_secs(20)).await;
        assert_eq!(limiter.hit(TIGHT, "ip").await, Err(Duration::from_secs(40)));

        tokio::time::advance(Duration::from_secs(41)).await;
        assert!(limiter.hit(TIGHT, "ip").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_drops_stale_windows() {
        let limiter = RateLimiter::new();
        limiter.hit(LOGIN_LIMIT, "old").await.ok();
        tokio::time::advance(Duration::from_secs(301)).await;
        limiter.hit(LOGIN_LIMIT, "fresh").await.ok();

        limiter.cleanup().await;
        let windows = limiter.windows.lock().await;
        assert_eq!(windows.len(), 1);
        assert!(windows.contains_key(&("login", "fresh".to_owned())));
    }

    #[test]
    fn rejection_carries_retry_after() {
        let response = rejected(TIGHT, "ip", Duration::from_millis(12_300));
        assert_eq!(response.status(), http::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "13");
    }

    #[test]
    fn client_ip_prefers_first_forwarded_hop() {
        let proxied = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&proxied), "203.0.113.9");

        let mut direct = Request::builder().body(Body::empty()).unwrap();
        direct
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 4], 4242))));
        assert_eq!(client_ip(&direct), "192.0.2.4");

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&bare), "unknown");
    }
}
