//! Command-line and environment configuration.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--host` | `NSEQUOTE_HOST` | `0.0.0.0` |
//! | `--port` | `PORT` | `8000` |
//! | `--static-dir` | `NSEQUOTE_STATIC_DIR` | `static` |
//! | `--exchange-suffix` | `NSEQUOTE_EXCHANGE_SUFFIX` | `.NS` |
//! | `--timeout-ms` | `NSEQUOTE_TIMEOUT_MS` | `10000` |
//! | `--log-level` | `NSEQUOTE_LOG` | `info` |

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use nsequote_core::DEFAULT_EXCHANGE_SUFFIX;

use crate::error::ServerError;

/// NSE stock data API and web UI.
#[derive(Debug, Clone, Parser)]
#[command(name = "nsequote", author, version, about = "NSE stock data API and web UI")]
pub struct ServerConfig {
    /// Interface to listen on.
    #[arg(long, env = "NSEQUOTE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory holding index.html and the UI assets served under /static.
    #[arg(long, env = "NSEQUOTE_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Suffix appended to symbols for market-data lookups.
    #[arg(long, env = "NSEQUOTE_EXCHANGE_SUFFIX", default_value = DEFAULT_EXCHANGE_SUFFIX)]
    pub exchange_suffix: String,

    /// Per-call timeout for upstream provider requests.
    #[arg(long, env = "NSEQUOTE_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "NSEQUOTE_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let value = format!("{}:{}", self.host, self.port);
        value
            .parse()
            .map_err(|source| ServerError::InvalidAddress { value, source })
    }
}
