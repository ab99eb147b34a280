//! Shared helpers: a mock origin and a proxy on ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Router, extract::Path, http::StatusCode, routing};
use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use forward_proxy::cache::CacheStore;
use forward_proxy::origin::OriginClient;
use forward_proxy::rate_limit::RateLimiter;
use forward_proxy::state::AppState;
use forward_proxy::{Args, Dispatcher};

pub const PAGE_BODY: &str = "<html><body>hello from origin</body></html>";

/// Mock origin. Every request bumps the returned hit counter.
pub struct Origin {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
}

impl Origin {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn start_origin() -> Origin {
    let hits = Arc::new(AtomicUsize::new(0));

    let h = hits.clone();
    let page = move || {
        let h = h.clone();
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            PAGE_BODY
        }
    };
    let h = hits.clone();
    let missing = move || {
        let h = h.clone();
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            (StatusCode::NOT_FOUND, "nothing here")
        }
    };
    let h = hits.clone();
    let item = move |Path(id): Path<u32>| {
        let h = h.clone();
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            format!("item-{id}")
        }
    };

    let app = Router::new()
        .route("/page", routing::get(page))
        .route("/missing", routing::get(missing))
        .route("/item/{id}", routing::get(item));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Origin { addr, hits }
}

/// Starts a proxy on an ephemeral port. `extra` are additional CLI flags.
pub async fn start_proxy(extra: &[&str]) -> (SocketAddr, Arc<AppState>) {
    let mut argv = vec!["forward-proxy", "--port", "0"];
    argv.extend_from_slice(extra);
    let args = Args::parse_from(argv);

    // bypass any HTTP_PROXY in the environment for loopback origins
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(args.fetch_timeout())
        .build()
        .unwrap();
    let state = Arc::new(AppState {
        origin: OriginClient::from_client(client),
        cache: CacheStore::new(args.cache_ttl()),
        rate_limiter: RateLimiter::new(args.max_requests_per_ip, args.rate_window()),
        max_request_bytes: args.max_request_bytes,
        read_timeout: args.read_timeout(),
    });

    let dispatcher = Dispatcher::bind_with_state(&args, state).await.unwrap();
    let addr = dispatcher.local_addr();
    let state = dispatcher.state();
    tokio::spawn(async move {
        let _ = dispatcher.run().await;
    });

    (addr, state)
}

/// Sends raw bytes and returns everything received before close.
/// A reset counts as end of stream.
pub async fn send_raw(proxy: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(proxy).await.unwrap();
    let _ = stream.write_all(raw).await;
    let mut buf = Vec::new();
    let _ = tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut buf)).await;
    buf
}

pub async fn get(proxy: SocketAddr, url: &str) -> Vec<u8> {
    let req = format!("GET {url} HTTP/1.1\r\nHost: proxy\r\n\r\n");
    send_raw(proxy, req.as_bytes()).await
}
