use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Token bucket for one client.
struct Bucket {
    tokens: f64,
    last_seen: Instant,
}

impl Bucket {
    fn take(&mut self, now: Instant, capacity: f64, refill_per_sec: f64) -> bool {
        let elapsed = now.duration_since(self.last_seen).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_per_sec).min(capacity);
        self.last_seen = now;
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-IP limiter for the public form and beacon endpoints.
pub struct SubmitLimiter {
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl SubmitLimiter {
    pub fn new(burst: usize, refill_per_sec: f64) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            capacity: burst as f64,
            refill_per_sec,
        }
    }

    /// Spend one token for `ip`. `false` means the request should be refused.
    pub async fn allow(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(ip).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_seen: now,
        });
        bucket.take(now, self.capacity, self.refill_per_sec)
    }

    /// Forget clients not seen within `idle`.
    pub async fn prune(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        buckets.retain(|_, b| now.duration_since(b.last_seen) < idle);
        before - buckets.len()
    }

    pub async fn tracked_clients(&self) -> usize {
        self.buckets.lock().await.len()
    }
}
