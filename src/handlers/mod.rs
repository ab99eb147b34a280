mod health;
mod metrics;

use axum::{Router, routing::get};

pub use health::health_handler;
pub use metrics::metrics_handler;

// side server next to the proxy port
pub fn admin_router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
}
