use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub bcrypt_cost: u32,
    pub default_user_password: String,
    pub token_sweep_interval_secs: u64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_secs: hours_or("JWT_EXPIRATION", 8)? * 3600,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: parsed_or("SERVER_PORT", 3001)?,
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".into()),
            bcrypt_cost: parsed_or("BCRYPT_COST", 10)?,
            default_user_password: env::var("DEFAULT_USER_PASSWORD")
                .unwrap_or_else(|_| "1234".into()),
            token_sweep_interval_secs: hours_or("TOKEN_SWEEP_INTERVAL", 168)? * 3600,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn token_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.token_sweep_interval_secs)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Reads a duration expressed in hours, accepting an optional `h` suffix ("8h").
fn hours_or(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_hours(&value).ok_or(ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_hours(raw: &str) -> Option<u64> {
    raw.trim().trim_end_matches('h').parse().ok()
}
