//! Process configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` | listen address |
//! | `STOCK_STORE` | `memory` | `memory` or `postgres` |
//! | `DATABASE_URL` | none | required when `STOCK_STORE=postgres` |
//!
//! `RUST_LOG` and `LOG_FORMAT` are read by `brewstock-observability`.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a socket address: {0}")]
    InvalidBindAddr(String),

    #[error("STOCK_STORE must be one of: memory, postgres (got {0})")]
    UnknownStore(String),

    #[error("DATABASE_URL must be set when STOCK_STORE=postgres")]
    MissingDatabaseUrl,
}

/// Which `StockStore` implementation backs the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreBackend::Memory,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr.clone()))?;

        let store = match lookup("STOCK_STORE") {
            None => StoreBackend::Memory,
            Some(kind) => match kind.trim().to_lowercase().as_str() {
                "" | "memory" => StoreBackend::Memory,
                "postgres" => {
                    let database_url = lookup("DATABASE_URL")
                        .filter(|url| !url.trim().is_empty())
                        .ok_or(ConfigError::MissingDatabaseUrl)?;
                    StoreBackend::Postgres { database_url }
                }
                _ => return Err(ConfigError::UnknownStore(kind)),
            },
        };

        Ok(Self { bind_addr, store })
    }
}
