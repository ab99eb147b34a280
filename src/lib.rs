pub mod cache;
pub mod compress;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod origin;
pub mod rate_limit;
pub mod request;
pub mod state;
pub mod worker;

pub use config::Args;
pub use dispatcher::Dispatcher;
pub use error::{ProxyError, ServerError};
