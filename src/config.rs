//! Environment configuration.
//!
//! Plain settings come from environment variables with defaults. Secrets are
//! read from `/run/secrets/<NAME>` first (Docker/Swarm secrets) and fall back
//! to the environment variable of the same name.

use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },

    #[error("{0} is required")]
    Missing(String),
}

/// Credentials of the admin account created at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub cors_max_age: Duration,
    pub admin: Option<AdminSeed>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok(), read_secret_file)
    }

    /// Builds the configuration from arbitrary variable and secret sources.
    fn from_lookup(
        var: impl Fn(&str) -> Option<String>,
        secret_file: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let secret = |key: &str| secret_file(key).or_else(|| var(key));

        let jwt_secret = secret("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::Missing("JWT_SECRET".into()))?;

        let admin = match (var("ADMIN_EMAIL"), secret("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: var("ADMIN_NAME").unwrap_or_else(|| "Administrator".into()),
                email,
                password,
            }),
            (Some(_), None) => {
                warn!("ADMIN_EMAIL set without ADMIN_PASSWORD, no admin will be created");
                None
            }
            _ => None,
        };

        Ok(Self {
            port: try_load(&var, "PORT", "8080")?,
            jwt_secret,
            token_ttl: Duration::from_secs(try_load(&var, "TOKEN_TTL_SECS", "3600")?),
            uploads_dir: try_load(&var, "UPLOADS_DIR", "uploads")?,
            max_upload_bytes: try_load(&var, "MAX_UPLOAD_BYTES", "52428800")?,
            cors_max_age: Duration::from_secs(try_load(&var, "CORS_MAX_AGE_SECS", "3600")?),
            admin,
        })
    }
}

fn try_load<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

fn read_secret_file(secret_name: &str) -> Option<String> {
    let path = format!("{SECRETS_DIR}/{secret_name}");
    read_to_string(&path).map(|s| s.trim().to_string()).ok()
}
