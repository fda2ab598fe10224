//! Application state

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::RateLimiter;
use crate::config::Config;
use crate::email::Mailer;
use crate::storage::{ImageHost, ImageStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    pub mailer: Mailer,
    /// Local mirror + optional cloud image host
    pub images: ImageStore,
    /// JWT secret for restaurant authentication
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
    /// Allowed CORS origins (empty = mirror any origin)
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Connect, run migrations and build clients
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Self::with_pool(config, pool)
    }

    /// Build state around an existing pool (no migrations)
    pub fn with_pool(config: &Config, pool: PgPool) -> Result<Self, BoxError> {
        let mailer = Mailer::from_config(config)?;

        let host = config.cloudinary.clone().map(ImageHost::new);
        if host.is_none() {
            tracing::warn!("Cloudinary not configured, images are served from the local mirror");
        }
        let images = ImageStore::new(&config.upload_dir, &config.public_base_url, host);

        Ok(Self {
            pool,
            mailer,
            images,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_hours: config.jwt_expiry_hours,
            rate_limiter: RateLimiter::new(),
            cors_origins: config.cors_origins.clone(),
        })
    }
}
