// src/config.rs
use crate::source::DEFAULT_COLLECTION;
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: {value}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub collection: String,
    pub document_db: String,
    pub seed_file: Option<String>,
    pub firestore_project_id: Option<String>,
    pub firestore_api_key: Option<String>,
}

impl Config {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = parse(
            "BIND_ADDR",
            "socket address",
            var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
        )?;
        let max_workers = parse(
            "MAX_WORKERS",
            "worker count",
            var("MAX_WORKERS").unwrap_or_else(|| "8".to_string()),
        )?;

        Ok(Self {
            bind_addr,
            max_workers,
            collection: var("LISTINGS_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            document_db: var("DOCUMENT_DB").unwrap_or_else(|| "apartments.sqlite3".to_string()),
            seed_file: var("SEED_FILE"),
            firestore_project_id: var("FIRESTORE_PROJECT_ID"),
            firestore_api_key: var("FIRESTORE_API_KEY"),
        })
    }
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    let parsed = value.trim().parse();
    parsed.map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value,
    })
}
