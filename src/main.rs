use clap::Parser; // for cli
use forward_proxy::{Args, Dispatcher, ServerError, handlers::admin_router};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// this is main async function with tokio
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "forward_proxy=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();
    let dispatcher = Dispatcher::bind(&args).await?;

    tracing::info!(
        cache_ttl_secs = args.cache_ttl,
        max_requests_per_ip = args.max_requests_per_ip,
        rate_window_secs = args.rate_window,
        fetch_timeout_secs = args.fetch_timeout,
        "Configuration loaded"
    );

    if let Some(port) = args.admin_port {
        let addr = format!("{}:{}", args.host, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;
        tracing::info!(address = %addr, "Admin endpoints on /health and /metrics");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, admin_router()).await {
                tracing::error!(error = %e, "admin server stopped");
            }
        });
    }

    dispatcher.run().await
}
