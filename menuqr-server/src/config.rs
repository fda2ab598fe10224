//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SMTP transport settings (mail is disabled when `host` is unset)
#[derive(Debug, Clone, Default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Cloudinary credentials
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for restaurant tokens
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub smtp: SmtpConfig,
    /// Sender mailbox, e.g. `MenuQR <noreply@menuqr.app>`
    pub email_from: String,
    /// SPA base URL, used in password reset links
    pub frontend_url: String,
    /// `None` disables the cloud image mirror
    pub cloudinary: Option<CloudinaryConfig>,
    /// Local upload mirror root, served under `/uploads`
    pub upload_dir: String,
    /// Base URL for locally served images
    pub public_base_url: String,
    /// Allowed CORS origins (empty = mirror any origin)
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub log_json: bool,
    /// Directory for daily-rotated log files
    pub log_dir: Option<String>,
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let http_port = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let cloudinary = match (
            env_opt("CLOUDINARY_CLOUD_NAME"),
            env_opt("CLOUDINARY_API_KEY"),
            env_opt("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port,
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .filter(|h| *h > 0)
                .unwrap_or(24),
            smtp: SmtpConfig {
                host: env_opt("SMTP_HOST"),
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                username: env_opt("SMTP_USERNAME"),
                password: env_opt("SMTP_PASSWORD"),
            },
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "MenuQR <noreply@menuqr.app>".into()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            cloudinary,
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{http_port}"))
                .trim_end_matches('/')
                .to_string(),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_dir: env_opt("LOG_DIR"),
        })
    }

    /// Minimal config for tests and tooling; no env access.
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/menuqr_test".into(),
            http_port: 5000,
            environment: "development".into(),
            jwt_secret: "test-secret".into(),
            jwt_expiry_hours: 24,
            smtp: SmtpConfig::default(),
            email_from: "MenuQR <noreply@menuqr.app>".into(),
            frontend_url: "http://localhost:3000".into(),
            cloudinary: None,
            upload_dir: std::env::temp_dir()
                .join("menuqr-test-uploads")
                .to_string_lossy()
                .into_owned(),
            public_base_url: "http://localhost:5000".into(),
            cors_origins: Vec::new(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_trims_and_skips_empty() {
        assert_eq!(
            parse_origins(" https://a.app/ , ,https://b.app"),
            vec!["https://a.app".to_string(), "https://b.app".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn require_secret_falls_back_in_development() {
        let val = Config::require_secret("MENUQR_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(val, "dev-MENUQR_TEST_UNSET_SECRET-not-for-production");
        assert!(Config::require_secret("MENUQR_TEST_UNSET_SECRET", "production").is_err());
    }
}
