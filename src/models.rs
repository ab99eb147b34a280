use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::TcpStream;

// Accepted connection waiting for a worker
pub struct ProxyJob {
    pub stream: TcpStream,
    pub peer: SocketAddr,
    pub accepted_at: Instant,
}

// What a finished connection delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    Cache,
    Origin,
}
