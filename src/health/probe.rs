//! Backend admission probe.
//!
//! # Responsibilities
//! - Verify a backend candidate answers HTTP before it is trusted
//! - Retry a fixed number of times with a fixed pause between attempts
//!
//! # Design Decisions
//! - Only an exact 200 counts as success
//! - Transport errors, timeouts and other statuses all consume one attempt
//! - An attempt never outlives its interval slot, which bounds the whole probe
//! - The caller awaits the whole retry loop; event processing is paused meanwhile

use std::future::Future;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;
use url::Url;

use crate::config::ProbeConfig;
use crate::observability::metrics;

/// Checks whether a backend candidate is healthy enough to admit.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self, addr: SocketAddr) -> bool;
}

/// Result of one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Ok,
    Status(u16),
    Transport(String),
}

/// How many attempts to make and how long to wait after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_secs(1),
        }
    }
}

impl From<&ProbeConfig> for RetryPolicy {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            attempts: config.attempts,
            interval: Duration::from_millis(config.interval_ms),
        }
    }
}

/// Run `attempt` until it reports success or the policy is exhausted.
///
/// Each attempt owns a slot of `policy.interval`. An attempt still running at
/// the end of its slot is abandoned, and a failed attempt waits out the rest of
/// its slot, so an exhausted probe blocks for exactly `attempts * interval`.
pub async fn retry_probe<F, Fut>(policy: RetryPolicy, mut attempt: F) -> bool
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AttemptOutcome>,
{
    for n in 1..=policy.attempts {
        let slot_end = time::Instant::now() + policy.interval;
        match time::timeout_at(slot_end, attempt(n)).await {
            Ok(AttemptOutcome::Ok) => return true,
            Ok(AttemptOutcome::Status(status)) => {
                tracing::debug!(attempt = n, status, "Probe attempt got non-200 response");
            }
            Ok(AttemptOutcome::Transport(error)) => {
                tracing::debug!(attempt = n, error = %error, "Probe attempt failed");
            }
            Err(_) => {
                tracing::debug!(attempt = n, "Probe attempt timed out");
            }
        }
        time::sleep_until(slot_end).await;
    }
    false
}

/// HTTP GET probe.
pub struct HttpProbe {
    client: Client<HttpConnector, Body>,
    policy: RetryPolicy,
    path: String,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(HttpConnector::new());

        Self {
            client,
            policy: RetryPolicy::from(config),
            path: config.path.clone(),
        }
    }

    async fn attempt(&self, addr: SocketAddr) -> AttemptOutcome {
        let url = match Url::parse(&format!("http://{}", addr)).and_then(|base| base.join(&self.path)) {
            Ok(url) => url,
            Err(e) => return AttemptOutcome::Transport(format!("invalid probe url: {}", e)),
        };

        let request = match Request::builder()
            .method("GET")
            .uri(url.as_str())
            .header("user-agent", "pod-balancer-probe")
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => return AttemptOutcome::Transport(e.to_string()),
        };

        match self.client.request(request).await {
            Ok(response) if response.status() == StatusCode::OK => AttemptOutcome::Ok,
            Ok(response) => AttemptOutcome::Status(response.status().as_u16()),
            Err(e) => AttemptOutcome::Transport(e.to_string()),
        }
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn probe(&self, addr: SocketAddr) -> bool {
        let started = Instant::now();
        let healthy = retry_probe(self.policy, |_| self.attempt(addr)).await;

        metrics::record_probe(healthy, started.elapsed());
        if healthy {
            tracing::debug!(%addr, elapsed = ?started.elapsed(), "Backend answered probe");
        } else {
            tracing::warn!(%addr, attempts = self.policy.attempts, "Backend probe exhausted all attempts");
        }
        healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_probe_blocks_ten_seconds() {
        let calls = Cell::new(0);
        let start = time::Instant::now();

        let healthy = retry_probe(RetryPolicy::default(), |_| {
            calls.set(calls.get() + 1);
            async { AttemptOutcome::Status(503) }
        })
        .await;

        assert!(!healthy);
        assert_eq!(calls.get(), 10);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_millis(10_100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_errors_consume_attempts() {
        let start = time::Instant::now();

        let healthy = retry_probe(RetryPolicy::default(), |n| async move {
            if n < 4 {
                AttemptOutcome::Transport("connection refused".into())
            } else {
                AttemptOutcome::Ok
            }
        })
        .await;

        assert!(healthy);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_does_not_wait() {
        let start = time::Instant::now();
        assert!(retry_probe(RetryPolicy::default(), |_| async { AttemptOutcome::Ok }).await);
        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_attempts_bounded_by_slots() {
        let start = time::Instant::now();

        let healthy = retry_probe(RetryPolicy::default(), |_| {
            std::future::pending::<AttemptOutcome>()
        })
        .await;

        assert!(!healthy);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_millis(10_100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_failure_waits_only_remainder() {
        let policy = RetryPolicy { attempts: 2, interval: Duration::from_secs(1) };
        let start = time::Instant::now();

        let healthy = retry_probe(policy, |_| async {
            time::sleep(Duration::from_millis(700)).await;
            AttemptOutcome::Status(503)
        })
        .await;

        assert!(!healthy);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_millis(2_100));
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from(&ProbeConfig::default());
        assert_eq!(policy, RetryPolicy::default());
    }
}
