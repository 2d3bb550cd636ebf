use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load from the environment. Missing secrets or malformed TTLs fail
    /// here, at startup, not at first request.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;

        let access_secret =
            std::env::var("JWT_ACCESS_SECRET").context("JWT_ACCESS_SECRET is required")?;
        let refresh_secret =
            std::env::var("JWT_REFRESH_SECRET").context("JWT_REFRESH_SECRET is required")?;
        anyhow::ensure!(!access_secret.is_empty(), "JWT_ACCESS_SECRET must not be empty");
        anyhow::ensure!(!refresh_secret.is_empty(), "JWT_REFRESH_SECRET must not be empty");

        let access_ttl_minutes = env_minutes("JWT_ACCESS_EXPIRATION", 15)?;
        let refresh_ttl_minutes = env_minutes("JWT_REFRESH_EXPIRATION", 60 * 24 * 7)?;
        anyhow::ensure!(
            access_ttl_minutes > 0,
            "JWT_ACCESS_EXPIRATION must be positive"
        );
        anyhow::ensure!(
            access_ttl_minutes < refresh_ttl_minutes,
            "JWT_ACCESS_EXPIRATION must be shorter than JWT_REFRESH_EXPIRATION"
        );

        Ok(Self {
            database_url,
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                access_ttl_minutes,
                refresh_ttl_minutes,
            },
        })
    }
}

fn env_minutes(key: &str, default: i64) -> anyhow::Result<i64> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<i64>()
            .with_context(|| format!("{key} must be an integer number of minutes")),
        Err(_) => Ok(default),
    }
}
