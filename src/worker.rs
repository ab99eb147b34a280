use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::Lookup;
use crate::compress::compress;
use crate::error::{FetchError, ProxyError};
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, CACHE_STALE, MALFORMED_REQUESTS, ORIGIN_ERRORS, RATE_LIMITED,
    REQUEST_LATENCY, REQUEST_TOTAL,
};
use crate::models::{ProxyJob, Served};
use crate::request::{parse_target, read_request_line};
use crate::state::AppState;

const COMPRESSION_FAILED: &[u8] = b"Error: Failed to compress response";

// starts `count` workers sharing one job queue
pub fn spawn_workers(
    count: usize,
    rx: mpsc::Receiver<ProxyJob>,
    state: Arc<AppState>,
) -> Vec<JoinHandle<()>> {
    let rx = Arc::new(Mutex::new(rx));
    (0..count)
        .map(|id| tokio::spawn(worker_loop(id, Arc::clone(&rx), Arc::clone(&state))))
        .collect()
}

async fn worker_loop(id: usize, rx: Arc<Mutex<mpsc::Receiver<ProxyJob>>>, state: Arc<AppState>) {
    debug!(worker = id, "worker started");

    loop {
        // only the idle worker holding the lock waits on the queue
        let job = { rx.lock().await.recv().await };
        let Some(job) = job else { break };

        let peer = job.peer;
        // separate task so a panic in one connection leaves the worker alive
        if let Err(e) = tokio::spawn(handle_job(Arc::clone(&state), job)).await {
            error!(worker = id, peer = %peer, error = %e, "connection handler panicked");
        }
    }

    debug!(worker = id, "job queue closed, worker exiting");
}

// runs one connection through the pipeline and always closes it
pub async fn handle_job(state: Arc<AppState>, job: ProxyJob) {
    let ProxyJob {
        mut stream,
        peer,
        accepted_at,
    } = job;
    REQUEST_TOTAL.inc();

    match serve(&state, &mut stream, peer).await {
        Ok(served) => debug!(peer = %peer, ?served, "connection done"),
        Err(ProxyError::RateLimitExceeded(ip)) => {
            RATE_LIMITED.inc();
            warn!(ip = %ip, "Rate limit exceeded");
        }
        Err(ProxyError::MalformedRequest(reason)) => {
            MALFORMED_REQUESTS.inc();
            warn!(peer = %peer, reason = %reason, "malformed request, dropping connection");
        }
        Err(ProxyError::Fetch(e)) => {
            ORIGIN_ERRORS.inc();
            error!(peer = %peer, error = %e, "origin fetch failed");
        }
        Err(e @ (ProxyError::Compression(_) | ProxyError::Task(_))) => {
            error!(peer = %peer, error = %e, "failed to compress content");
        }
        Err(ProxyError::Io(e)) => {
            warn!(peer = %peer, error = %e, "socket error");
        }
    }

    // no keep-alive
    let _ = stream.shutdown().await;
    REQUEST_LATENCY.observe(accepted_at.elapsed().as_secs_f64());
}

// the origin failure is what gets reported, even if the client already left
async fn report_fetch_error<W>(stream: &mut W, err: FetchError) -> ProxyError
where
    W: AsyncWrite + Unpin,
{
    if let Err(e) = stream.write_all(err.client_message().as_bytes()).await {
        debug!(error = %e, "could not deliver fetch error to client");
    }
    ProxyError::Fetch(err)
}

async fn serve(
    state: &AppState,
    stream: &mut TcpStream,
    peer: SocketAddr,
) -> Result<Served, ProxyError> {
    if !state.rate_limiter.admit(peer.ip()) {
        return Err(ProxyError::RateLimitExceeded(peer.ip()));
    }

    let line = read_request_line(stream, state.max_request_bytes, state.read_timeout).await?;
    let url = parse_target(&line)?;
    info!(ip = %peer.ip(), url = %url, "Client request");

    let (payload, served) = match state.cache.get(&url) {
        Lookup::Fresh(payload) => {
            CACHE_HITS.inc();
            info!(url = %url, "Fetching from cache");
            (payload, Served::Cache)
        }
        lookup => {
            if matches!(lookup, Lookup::Stale(_)) {
                CACHE_STALE.inc();
                info!(url = %url, "Cached response expired, fetching from origin");
            } else {
                CACHE_MISSES.inc();
                info!(url = %url, "Cache miss, fetching from origin");
            }

            match state.origin.fetch(&url).await {
                Ok(payload) => {
                    state.cache.put(&url, payload.clone());
                    (payload, Served::Origin)
                }
                Err(e) => return Err(report_fetch_error(stream, e).await),
            }
        }
    };

    let compressed = match tokio::task::spawn_blocking(move || compress(&payload)).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            stream.write_all(COMPRESSION_FAILED).await?;
            return Err(e.into());
        }
        Err(e) => {
            stream.write_all(COMPRESSION_FAILED).await?;
            return Err(e.into());
        }
    };

    stream.write_all(&compressed).await?;
    stream.flush().await?;
    info!(url = %url, bytes = compressed.len(), "Server response sent");

    Ok(served)
}
