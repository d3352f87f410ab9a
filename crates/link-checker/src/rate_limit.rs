//! Per-host sliding-window request throttling.

use std::collections::HashMap;
use std::time::Duration;

use agentdir_core::netloc_of;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

const WINDOW: Duration = Duration::from_secs(1);

/// Admits at most `max_per_second` requests per host in any one-second
/// window. One instance per run; state is never shared across runs.
#[derive(Debug)]
pub struct RateLimiter {
    max_per_second: usize,
    hosts: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    /// A ceiling of zero is treated as one.
    pub fn new(max_per_second: usize) -> Self {
        RateLimiter {
            max_per_second: max_per_second.max(1),
            hosts: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_per_second(&self) -> usize {
        self.max_per_second
    }

    /// Suspend until a request to `url`'s host is admitted, then record it.
    ///
    /// The lock is released while sleeping so other hosts proceed.
    pub async fn wait_if_needed(&self, url: &str) {
        let host = netloc_of(url);
        loop {
            let wait = {
                let mut hosts = self.hosts.lock().await;
                let now = Instant::now();
                let stamps = hosts.entry(host.clone()).or_default();
                stamps.retain(|t| now.duration_since(*t) < WINDOW);
                if stamps.len() < self.max_per_second {
                    stamps.push(now);
                    return;
                }
                WINDOW.saturating_sub(now.duration_since(stamps[0]))
            };
            debug!(host = %host, wait_ms = wait.as_millis() as u64, "rate limit reached");
            tokio::time::sleep(wait).await;
        }
    }
}
