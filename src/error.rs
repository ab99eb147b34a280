use std::io;
use std::net::IpAddr;

use thiserror::Error;

use crate::config::ConfigError;

// failure to obtain a 200 response from the origin
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("origin answered {0}")]
    Status(reqwest::StatusCode),

    #[error("request to origin failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    // plaintext written back to the client before the connection closes
    pub fn client_message(&self) -> String {
        match self {
            FetchError::Status(status) => format!("Error: {status}"),
            FetchError::Transport(_) => "Error: Failed to fetch URL".to_string(),
        }
    }
}

#[derive(Debug, Error)]
#[error("gzip encoding failed: {0}")]
pub struct CompressionError(#[from] pub io::Error);

// everything that can end a single proxied connection
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("rate limit exceeded for {0}")]
    RateLimitExceeded(IpAddr),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Compression(#[from] CompressionError),

    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    #[error("compression task did not finish: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// startup failures
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
