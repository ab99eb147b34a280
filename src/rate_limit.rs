use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

// Request counts per source address since window_start
pub struct RateWindow {
    pub window_start: Instant,
    pub counts: HashMap<IpAddr, u32>,
}

// per-address throttle over one shared window
pub struct RateLimiter {
    window: Mutex<RateWindow>,
    max_requests: u32,
    interval: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, interval: Duration) -> Self {
        Self::starting_at(max_requests, interval, Instant::now())
    }

    pub fn starting_at(max_requests: u32, interval: Duration, start: Instant) -> Self {
        Self {
            window: Mutex::new(RateWindow {
                window_start: start,
                counts: HashMap::new(),
            }),
            max_requests,
            interval,
        }
    }

    pub fn admit(&self, addr: IpAddr) -> bool {
        self.admit_at(addr, Instant::now())
    }

    pub fn admit_at(&self, addr: IpAddr, now: Instant) -> bool {
        let mut window = self.window.lock();

        // window over..? reset everyone
        if now.saturating_duration_since(window.window_start) > self.interval {
            window.counts.clear();
            window.window_start = now;
        }

        let count = window.counts.entry(addr).or_insert(0);
        *count = count.saturating_add(1);
        *count <= self.max_requests
    }

    pub fn count_for(&self, addr: IpAddr) -> u32 {
        self.window.lock().counts.get(&addr).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[test]
    fn denies_once_count_exceeds_limit() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(3, Duration::from_secs(180), t0);

        let results: Vec<bool> = (0..5).map(|_| limiter.admit_at(ip(1), t0)).collect();
        assert_eq!(results, vec![true, true, true, false, false]);
    }

    #[test]
    fn addresses_are_counted_separately() {
        let t0 = Instant::now();
        let limiter = RateLimiter::starting_at(1, Duration::from_secs(180), t0);

        assert!(limiter.admit_at(ip(1), t0));
        assert!(!limiter.admit_at(ip(1), t0));
        assert!(limiter.admit_at(ip(2), t0));
    }

    #[test]
    fn window_reset_clears_every_address() {
        let t0 = Instant::now();
        let interval = Duration::from_secs(180);
        let limiter = RateLimiter::starting_at(2, interval, t0);

        limiter.admit_at(ip(1), t0);
        limiter.admit_at(ip(1), t0);
        assert!(!limiter.admit_at(ip(1), t0));
        limiter.admit_at(ip(2), t0);
        assert_eq!(limiter.count_for(ip(2)), 1);

        // exactly at the interval is still the same window
        assert!(!limiter.admit_at(ip(1), t0 + interval));

        let later = t0 + interval + Duration::from_secs(1);
        assert!(limiter.admit_at(ip(3), later));
        assert_eq!(limiter.count_for(ip(1)), 0);
        assert_eq!(limiter.count_for(ip(2)), 0);
        assert!(limiter.admit_at(ip(1), later));
    }

    #[test]
    fn concurrent_admits_never_over_admit() {
        let limiter = Arc::new(RateLimiter::new(100, Duration::from_secs(3600)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || (0..50).filter(|_| limiter.admit(ip(9))).count())
            })
            .collect();
        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(admitted, 100);
        assert_eq!(limiter.count_for(ip(9)), 400);
    }
}
