use std::env;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;
const MAX_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;
const DEFAULT_ADMIN_NAME: &str = "System Administrator Account";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Credentials of the administrator created on first start.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    pub admin_seed: Option<AdminSeed>,
}

/// Copies `.env` into the process environment. Runs before `init_logging`.
pub fn load_env_file() -> bool {
    dotenv::dotenv().is_ok()
}

/// Same as [`load_env_file`] for an explicit file. Variables already set win.
pub fn load_env_file_from(path: &Path) -> bool {
    dotenv::from_path(path).is_ok()
}

impl Config {
    /// Reads the process environment, which [`load_env_file`] may have extended.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = var("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let admin_seed = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: var("ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
                email,
                password,
            }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("ADMIN_EMAIL and ADMIN_PASSWORD must both be set to seed an administrator");
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", DEFAULT_PORT)?,
            jwt_secret,
            token_ttl_seconds: check_ttl(parse_or("JWT_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?)?,
            admin_seed,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn check_ttl(seconds: u64) -> Result<u64, ConfigError> {
    if seconds == 0 || seconds > MAX_TOKEN_TTL_SECONDS {
        return Err(ConfigError::Invalid {
            key: "JWT_TTL_SECONDS",
            message: format!("must be between 1 and {MAX_TOKEN_TTL_SECONDS}"),
        });
    }
    Ok(seconds)
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
    }
}
