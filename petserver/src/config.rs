//! Server configuration
//!
//! Command line arguments (with `PETS_*` environment fallbacks) and the
//! validated configuration built from them.

use clap::Parser;
use std::net::SocketAddr;

use shared::SharedError;
use crate::core::DEFAULT_PAGE_SIZE;
use crate::error::PetServerResult;

/// Path the pet routes are mounted under
pub const PETS_PATH: &str = "/api/pets";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "petserver")]
#[command(about = "Pet registry HTTP service")]
pub struct Args {
    /// Interface to bind the HTTP server to
    #[arg(long, env = "PETS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP server
    #[arg(long, env = "PETS_PORT", default_value = "8000")]
    pub port: u16,

    /// Number of pets per listing page
    #[arg(long, env = "PETS_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PETS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Tracing endpoint URL (if set, traces are also shipped here)
    #[arg(long, env = "PETS_TRACE_EP")]
    pub trace_ep: Option<String>,
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub page_size: usize,
    pub log_level: String,
    pub trace_endpoint: Option<String>,
}

impl ServerConfig {
    pub fn from_args(args: Args) -> PetServerResult<Self> {
        let bind_address: SocketAddr = format!("{}:{}", args.host, args.port).parse().map_err(|_| {
            SharedError::InvalidConfig {
                field: "host".to_string(),
                value: args.host.clone(),
            }
        })?;

        if args.page_size == 0 {
            return Err(SharedError::InvalidConfig {
                field: "page_size".to_string(),
                value: args.page_size.to_string(),
            }
            .into());
        }

        let log_level = args.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(SharedError::InvalidConfig {
                field: "log_level".to_string(),
                value: args.log_level,
            }
            .into());
        }

        Ok(Self {
            bind_address,
            page_size: args.page_size,
            log_level,
            trace_endpoint: args.trace_ep.filter(|url| !url.trim().is_empty()),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8000)),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
            trace_endpoint: None,
        }
    }
}
