use std::net::SocketAddr;

use thiserror::Error;

/// Process-level failures; request-level faults never end up here.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address '{value}': {source}")]
    InvalidAddress {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidAddress { .. } => 2,
            Self::Logging(_) => 3,
            Self::Bind { .. } => 10,
            Self::Serve(_) => 11,
        }
    }
}
