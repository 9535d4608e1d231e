use std::env;
use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_AWS_REGION: &str = "us-east-1";
const DEFAULT_UPLOAD_MAX_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    pub upload_max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket_name: String,
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Custom S3-compatible endpoint (MinIO, R2, ...). `None` means AWS.
    pub s3_endpoint: Option<String>,
}

impl Config {
    /// Loads the configuration from the process environment, after reading
    /// a `.env` file if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let upload_max_bytes = match optional("UPLOAD_MAX_BYTES") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: "UPLOAD_MAX_BYTES",
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_UPLOAD_MAX_BYTES,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr,
            storage: StorageConfig::from_env()?,
            upload_max_bytes,
        })
    }

    /// Only the database settings, for commands that never touch storage.
    pub fn database_url_from_env() -> Result<String, ConfigError> {
        dotenvy::dotenv().ok();
        required("DATABASE_URL")
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bucket_name: required("S3_BUCKET_NAME")?,
            aws_region: optional("AWS_REGION").unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            aws_access_key_id: required("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            s3_endpoint: optional("S3_ENDPOINT"),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
