use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("proxy_requests_total", "Total number of accepted connections").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("proxy_cache_hits_total", "Total fresh cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("proxy_cache_misses_total", "Total cache misses").unwrap();
    pub static ref CACHE_STALE: Counter =
        register_counter!("proxy_cache_stale_total", "Total stale cache hits that were refetched").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("proxy_rate_limited_total", "Connections closed by the rate limiter").unwrap();
    pub static ref ORIGIN_ERRORS: Counter =
        register_counter!("proxy_origin_errors_total", "Failed origin fetches").unwrap();
    pub static ref MALFORMED_REQUESTS: Counter =
        register_counter!("proxy_malformed_requests_total", "Requests without a usable request line").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "proxy_request_latency_seconds",
        "Time from accept to connection close"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("proxy_cache_size", "Current number of URLs in cache").unwrap();
}
