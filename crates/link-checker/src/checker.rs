//! Single-URL check with retry, backoff and GET fallback.

use std::time::Duration;

use tracing::debug;

use crate::probe::{ProbeError, ProbeMethod, Prober};
use crate::rate_limit::RateLimiter;

pub const TIMEOUT_MESSAGE: &str = "Timeout";
pub const RETRIES_EXHAUSTED_MESSAGE: &str = "Max retries exceeded";

/// Terminal result of checking one URL: a status code (0 when no response
/// was obtained) and an error message.
pub type CheckOutcome = (u16, Option<String>);

/// Backoff before retrying after failed attempt `attempt` (zero-based).
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(16))
}

/// Check `url`, making up to `retries` attempts.
///
/// Rate-limiter admission is taken once, before the first attempt. Each
/// attempt is a HEAD probe; a connection-level failure on the first attempt
/// is retried once immediately as a GET. Failed attempts sleep
/// `2^attempt` seconds before the next one. Never fails: every outcome is
/// folded into a `(code, message)` pair.
pub async fn check_url(
    prober: &dyn Prober,
    limiter: &RateLimiter,
    url: &str,
    timeout: Duration,
    retries: u32,
) -> CheckOutcome {
    limiter.wait_if_needed(url).await;

    for attempt in 0..retries {
        let last = attempt + 1 == retries;
        match prober.probe(ProbeMethod::Head, url, timeout).await {
            Ok(code) => return (code, None),
            Err(ProbeError::Timeout) => {
                if last {
                    return (0, Some(TIMEOUT_MESSAGE.to_string()));
                }
            }
            Err(ProbeError::Client(message)) => {
                if attempt == 0 {
                    match prober.probe(ProbeMethod::Get, url, timeout).await {
                        Ok(code) => return (code, None),
                        Err(e) => debug!(url, error = %e, "GET fallback failed"),
                    }
                }
                debug!(url, attempt, error = %message, "connection failed");
            }
            Err(ProbeError::Other(message)) => {
                if last {
                    return (0, Some(format!("Unexpected error: {message}")));
                }
            }
        }
        if !last {
            tokio::time::sleep(backoff_delay(attempt)).await;
        }
    }

    (0, Some(RETRIES_EXHAUSTED_MESSAGE.to_string()))
}
