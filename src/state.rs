use crate::cache::CacheStore;
use crate::config::Args;
use crate::origin::OriginClient;
use crate::rate_limit::RateLimiter;
// app's shared state

pub struct AppState {
    pub origin: OriginClient,
    pub cache: CacheStore,
    pub rate_limiter: RateLimiter,
    pub max_request_bytes: usize,
    pub read_timeout: std::time::Duration,
}

impl AppState {
    pub fn from_args(args: &Args) -> Result<Self, reqwest::Error> {
        Ok(Self {
            origin: OriginClient::new(args.fetch_timeout())?,
            cache: CacheStore::new(args.cache_ttl()),
            rate_limiter: RateLimiter::new(args.max_requests_per_ip, args.rate_window()),
            max_request_bytes: args.max_request_bytes,
            read_timeout: args.read_timeout(),
        })
    }
}
