use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use actix_web::http::header::HeaderValue;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Process settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// Public base URL that stored image paths are appended to.
    pub domain: String,
    pub upload_dir: PathBuf,
    pub migrations_root: Option<PathBuf>,
    pub bcrypt_cost: u32,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let bcrypt_cost: u32 = try_load(&var, "BCRYPT_COST", "12")?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                message: format!("{bcrypt_cost} is outside 4..=31"),
            });
        }

        let cors_origin: String = try_load(&var, "CORS_ORIGIN", "http://localhost:3000")?;
        check_origin(&cors_origin).map_err(|message| ConfigError::Invalid {
            key: "CORS_ORIGIN",
            message,
        })?;

        Ok(Self {
            database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            jwt_secret: var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            host: try_load(&var, "HOST", "0.0.0.0")?,
            port: try_load(&var, "PORT", "8000")?,
            domain: try_load(&var, "DOMAIN", "http://localhost:8000/uploads")?,
            upload_dir: try_load(&var, "UPLOAD_DIR", "./uploads")?,
            migrations_root: var("MIGRATIONS_ROOT").map(PathBuf::from),
            bcrypt_cost,
            cors_origin,
        })
    }
}

/// Credentialed CORS needs one concrete `scheme://host[:port]` origin.
fn check_origin(origin: &str) -> Result<(), String> {
    if origin == "*" {
        return Err("a wildcard cannot be used with credentials".to_string());
    }
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        return Err(format!("{origin} is not an http(s) origin"));
    }
    if origin.ends_with('/') {
        return Err(format!("{origin} must not end with '/'"));
    }
    HeaderValue::from_str(origin)
        .map(|_| ())
        .map_err(|e| format!("{origin}: {e}"))
}

fn try_load<T, V>(var: &V, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    V: Fn(&str) -> Option<String>,
{
    var(key)
        .unwrap_or_else(|| {
            log::info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        })
}
