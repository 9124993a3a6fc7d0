/// Configuration management for the API server
///
/// Configuration comes from environment variables; a `.env` file in the
/// working directory is loaded first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `API_CORS_ORIGINS`: comma-separated allowed origins, `*` for any (default: *)
/// - `API_PRODUCTION`: enables HSTS (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `DATABASE_MIN_CONNECTIONS`: warm connections (default: 2)
/// - `JWT_SECRET`: HS256 signing key, at least 32 characters (required)
/// - `JWT_TTL_HOURS`: access token lifetime (default: 24)
/// - `TOKEN_PRUNE_INTERVAL_MINUTES`: how often revoked and expired tokens are deleted (default: 60)
/// - `RUST_LOG`, `LOG_FORMAT`: read by the binary for logging
///
/// # Example
///
/// ```no_run
/// use inkwell_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use inkwell_shared::db::pool::DatabaseConfig as PoolConfig;
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode turns on HSTS
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing key (generate with `openssl rand -hex 32`)
    pub secret: String,

    /// Lifetime of issued access tokens in hours
    pub ttl_hours: i64,

    /// Minutes between token store cleanups
    pub prune_interval_minutes: u64,
}

fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` or `JWT_SECRET` is missing, the secret is
    /// too short, or a numeric/boolean variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET environment variable is required")?;

        let config = Self {
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: var_or("API_PORT", 8080u16)?,
                cors_origins: parse_origins(&env::var("API_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string())),
                production: var_or("API_PRODUCTION", false)?,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: var_or("DATABASE_MAX_CONNECTIONS", 10u32)?,
                min_connections: var_or("DATABASE_MIN_CONNECTIONS", 2u32)?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                ttl_hours: var_or("JWT_TTL_HOURS", 24i64)?,
                prune_interval_minutes: var_or("TOKEN_PRUNE_INTERVAL_MINUTES", 60u64)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that environment parsing alone cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LEN);
        }

        if self.jwt.ttl_hours <= 0 {
            anyhow::bail!("JWT_TTL_HOURS must be positive");
        }

        if self.jwt.prune_interval_minutes == 0 {
            anyhow::bail!("TOKEN_PRUNE_INTERVAL_MINUTES must be positive");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Lifetime of issued access tokens
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt.ttl_hours)
    }

    /// Period of the background token cleanup
    pub fn token_prune_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.jwt.prune_interval_minutes * 60)
    }

    /// Whether CORS should accept any origin
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }

    /// Pool settings for `inkwell_shared::db::pool`
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            ..Default::default()
        }
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/inkwell_test".to_string(),
            max_connections: 10,
            min_connections: 0,
        },
        jwt: JwtConfig {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            ttl_hours: 24,
            prune_interval_minutes: 60,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_validate_accepts_test_config() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = test_config();
        config.jwt.secret = "too-short".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 32 characters"));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = test_config();
        config.jwt.ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_prune_interval() {
        assert_eq!(test_config().token_prune_interval(), std::time::Duration::from_secs(3600));

        let mut config = test_config();
        config.jwt.prune_interval_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_ttl() {
        assert_eq!(test_config().token_ttl(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example,,"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(test_config().allows_any_origin());

        let mut config = test_config();
        config.api.cors_origins = parse_origins("https://a.example");
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_pool_config() {
        let pool = test_config().pool_config();
        assert_eq!(pool.url, "postgresql://localhost/inkwell_test");
        assert_eq!(pool.max_connections, 10);
        assert_eq!(pool.min_connections, 0);
    }
}
