//! HTTP transport built on a blocking ureq agent
//!
//! Requests run on tokio's blocking pool. The agent's global timeout matches
//! the resolver's per-candidate timeout, so a request abandoned by the race
//! frees its thread within one timeout.

use super::{IconFetcher, ProviderFailure, RawResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Fetches icons over HTTP(S)
#[derive(Clone)]
pub struct HttpFetcher {
    agent: Agent,
    timeout: Duration,
    max_icon_bytes: usize,
}

impl HttpFetcher {
    /// Create a fetcher that gives up after `timeout` and never buffers more
    /// than `max_icon_bytes + 1` bytes of a body
    pub fn new(timeout: Duration, max_icon_bytes: usize, user_agent: &str) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .user_agent(user_agent)
            .build();

        Self {
            agent: Agent::new_with_config(config),
            timeout,
            max_icon_bytes,
        }
    }
}

/// Map a transport error onto a candidate failure
fn classify(error: ureq::Error, timeout: Duration, max_bytes: usize) -> ProviderFailure {
    match error {
        ureq::Error::Timeout(_) => ProviderFailure::Timeout(timeout),
        ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => {
            ProviderFailure::Timeout(timeout)
        }
        ureq::Error::BodyExceedsLimit(_) => ProviderFailure::TooLarge { limit: max_bytes },
        other => ProviderFailure::Transport(other.to_string()),
    }
}

fn fetch_blocking(
    agent: &Agent,
    url: &str,
    timeout: Duration,
    max_bytes: usize,
) -> Result<RawResponse, ProviderFailure> {
    let mut response = match agent.get(url).header("Accept", "image/*").call() {
        Ok(response) => response,
        Err(ureq::Error::StatusCode(code)) => return Ok(RawResponse::status(code)),
        Err(e) => return Err(classify(e, timeout, max_bytes)),
    };

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    // Reject from the declared length before reading anything
    let declared = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if declared.is_some_and(|len| len > max_bytes as u64) {
        return Err(ProviderFailure::TooLarge { limit: max_bytes });
    }

    let body = response
        .body_mut()
        .with_config()
        .limit(max_bytes as u64 + 1)
        .read_to_vec()
        .map_err(|e| classify(e, timeout, max_bytes))?;

    Ok(RawResponse {
        status,
        content_type,
        body,
    })
}

#[async_trait]
impl IconFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawResponse, ProviderFailure> {
        let agent = self.agent.clone();
        let target = url.to_string();
        let timeout = self.timeout;
        let max_bytes = self.max_icon_bytes;

        debug!("GET {}", url);
        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &target, timeout, max_bytes))
            .await
            .map_err(|e| ProviderFailure::Transport(format!("fetch task failed: {}", e)))?
    }
}
