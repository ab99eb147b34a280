use clap::Parser;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    Zero(&'static str),
}

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "forward-proxy")]
#[command(about = "Caching, compressing forward proxy with per-IP throttling")]
pub struct Args {
    // Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    // Port to listen on (0 picks a free port)
    #[arg(short, long, default_value_t = 8888)]
    pub port: u16,

    // Max requests per source address within one rate window
    #[arg(long, default_value_t = 10)]
    pub max_requests_per_ip: u32,

    // Rate window in seconds
    #[arg(long, default_value_t = 180)]
    pub rate_window: u64,

    // Number of connection workers
    #[arg(short, long, default_value_t = 5)]
    pub workers: usize,

    // Cache TTL in seconds
    #[arg(short, long, default_value_t = 60)]
    pub cache_ttl: u64,

    // Timeout for the whole origin fetch, in seconds
    #[arg(long, default_value_t = 30)]
    pub fetch_timeout: u64,

    // How long to wait for the client's request line, in seconds
    #[arg(long, default_value_t = 10)]
    pub read_timeout: u64,

    // Max bytes buffered while looking for the end of the request line
    #[arg(long, default_value_t = 4096)]
    pub max_request_bytes: usize,

    // Jobs waiting for a free worker before accept stalls
    #[arg(long, default_value_t = 1024)]
    pub queue_capacity: usize,

    // Serve /health and /metrics on this port when set
    #[arg(long)]
    pub admin_port: Option<u16>,
}

impl Args {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Zero("workers"));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Zero("queue-capacity"));
        }
        if self.max_request_bytes == 0 {
            return Err(ConfigError::Zero("max-request-bytes"));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }
}
