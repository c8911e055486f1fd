//! Backoff for completion requests.
//!
//! 408, 429, 5xx and transport errors are retried; any other status is
//! returned as an error straight away. A `Retry-After` header (in seconds)
//! replaces the computed delay when it is shorter than `max_delay`.

use anyhow::Result;
use rand::Rng;
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total tries, the first one included.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier).min(self.max_delay)
    }
}

fn should_retry(status: StatusCode) -> bool {
    matches!(status, StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS)
        || status.is_server_error()
}

fn retry_after(response: &Response) -> Option<Duration> {
    let secs: u64 = response.headers().get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs))
}

/// Send with `send` until a 2xx arrives, a non-retryable status comes back,
/// or `config.max_attempts` is used up.
pub async fn with_retry<F, Fut>(config: &RetryConfig, endpoint: &str, send: F) -> Result<Response>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response>>,
{
    let attempts = config.max_attempts.max(1);
    let mut delay = config.initial_delay;
    let mut failure = String::from("no attempt made");

    for attempt in 1..=attempts {
        let mut wait = delay;
        match send().await {
            Ok(response) if response.status().is_success() => {
                if attempt > 1 {
                    tracing::info!("{} answered after {} attempts", endpoint, attempt);
                }
                return Ok(response);
            }
            Ok(response) => {
                let status = response.status();
                if let Some(hint) = retry_after(&response).filter(|d| *d <= config.max_delay) {
                    wait = hint;
                }
                let body = response.text().await.unwrap_or_default();
                let snippet: String = body.chars().take(200).collect();
                if !should_retry(status) {
                    anyhow::bail!("{} rejected the request ({}): {}", endpoint, status, snippet);
                }
                tracing::warn!("{} attempt {}/{}: {} {}", endpoint, attempt, attempts, status, snippet);
                failure = format!("{} ({})", status, snippet);
            }
            Err(e) => {
                tracing::warn!("{} attempt {}/{} failed: {:#}", endpoint, attempt, attempts, e);
                failure = format!("{:#}", e);
            }
        }

        if attempt < attempts {
            let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..250));
            tokio::time::sleep(wait + jitter).await;
            delay = config.next_delay(delay);
        }
    }

    anyhow::bail!("{} gave up after {} attempts: {}", endpoint, attempts, failure)
}
