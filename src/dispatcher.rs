// accept loop feeding the worker pool

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::Args;
use crate::error::ServerError;
use crate::models::ProxyJob;
use crate::state::AppState;
use crate::worker::spawn_workers;

pub struct Dispatcher {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: Arc<AppState>,
    workers: usize,
    queue_capacity: usize,
}

impl Dispatcher {
    // validates `args`, builds the shared state and binds the listener
    pub async fn bind(args: &Args) -> Result<Self, ServerError> {
        let state = Arc::new(AppState::from_args(args)?);
        Self::bind_with_state(args, state).await
    }

    // like bind but with caller-supplied state
    pub async fn bind_with_state(args: &Args, state: Arc<AppState>) -> Result<Self, ServerError> {
        args.validate()?;
        let addr = args.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            state,
            workers: args.workers,
            queue_capacity: args.queue_capacity,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    // accepts connections forever
    pub async fn run(self) -> Result<(), ServerError> {
        let (job_tx, job_rx) = mpsc::channel::<ProxyJob>(self.queue_capacity);
        let _workers = spawn_workers(self.workers, job_rx, Arc::clone(&self.state));

        info!(
            address = %self.local_addr,
            workers = self.workers,
            "Proxy server running"
        );

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };
            debug!(peer = %peer, "connection accepted");

            let job = ProxyJob {
                stream,
                peer,
                accepted_at: Instant::now(),
            };
            // waits while the queue is full
            if job_tx.send(job).await.is_err() {
                error!("all workers are gone, stopping accept loop");
                return Ok(());
            }
        }
    }
}
