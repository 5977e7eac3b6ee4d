//! Configuration management for the server.

use fleet_engine::query::DEFAULT_MAX_PAGE_SIZE;
use fleet_engine::{QueryLimits, DEFAULT_PAGE_SIZE};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection URL; the in-memory store is used when absent
    pub database_url: Option<String>,
    /// Page size for `/ships` when a page is requested without a size
    pub page_size: u64,
    /// Upper bound for requested page sizes
    pub max_page_size: u64,
    /// Whether `GET /sync` may wipe the store
    pub enable_reset: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3030,
            database_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            enable_reset: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort)?,
            None => defaults.port,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());

        let page_size = parse_size(lookup("PAGE_SIZE"), "PAGE_SIZE", defaults.page_size)?;
        let max_page_size = parse_size(
            lookup("MAX_PAGE_SIZE"),
            "MAX_PAGE_SIZE",
            defaults.max_page_size,
        )?;
        if page_size > max_page_size {
            return Err(ConfigError::PageSizeAboveMax {
                page_size,
                max_page_size,
            });
        }

        let enable_reset = match lookup("ENABLE_RESET").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(_) => return Err(ConfigError::InvalidFlag("ENABLE_RESET")),
        };

        Ok(Self {
            host,
            port,
            database_url,
            page_size,
            max_page_size,
            enable_reset,
        })
    }

    /// Page size bounds for parsing list queries.
    pub fn query_limits(&self) -> QueryLimits {
        QueryLimits {
            default_page_size: self.page_size,
            max_page_size: self.max_page_size,
        }
    }
}

fn parse_size(value: Option<String>, name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(value) => match value.parse() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(ConfigError::InvalidPageSize(name)),
        },
        None => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("{0} must be a positive integer")]
    InvalidPageSize(&'static str),

    #[error("PAGE_SIZE ({page_size}) exceeds MAX_PAGE_SIZE ({max_page_size})")]
    PageSizeAboveMax { page_size: u64, max_page_size: u64 },

    #[error("{0} must be true or false")]
    InvalidFlag(&'static str),
}
