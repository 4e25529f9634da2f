//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use std::result::Result;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::error::DynamoError;
use crate::protocol::classify_error;
use crate::transport::{HttpRequest, Transport};

pub(crate) const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(50);
pub(crate) const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Backoff tuning for throttled requests.
///
/// The first retry waits `base_delay`, each following retry waits twice as long
/// as the previous one. Once the next wait would reach or exceed `max_delay`, the
/// throttling error is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

/// Per-call retry bookkeeping. Never shared between calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryState {
    pub(crate) delay: Duration,
    pub(crate) attempts: u32,
}

impl RetryState {
    pub(crate) fn new() -> RetryState {
        RetryState::default()
    }

    /// Advance to the next delay, or return None if it would reach the ceiling.
    pub(crate) fn next_delay(&mut self, config: &RetryConfig) -> Option<Duration> {
        let next = if self.delay.is_zero() {
            config.base_delay
        } else {
            self.delay.saturating_mul(2)
        };
        if next >= config.max_delay {
            return None;
        }
        self.delay = next;
        Some(next)
    }
}

/// Send `req` until it succeeds, fails permanently, or the backoff ceiling is reached.
///
/// Returns the body of the first 2xx response. Transport failures are returned
/// immediately; only throttling classifications are retried, each time with the
/// identical signed request.
pub(crate) async fn send_with_retry(
    transport: &dyn Transport,
    req: &HttpRequest,
    config: &RetryConfig,
) -> Result<Vec<u8>, DynamoError> {
    let mut state = RetryState::new();
    loop {
        state.attempts += 1;
        trace!("attempt {} to {}", state.attempts, req.url);
        let resp = match transport.send(req).await {
            Ok(r) => r,
            Err(e) => {
                debug!("transport failure on attempt {}: {}", state.attempts, e);
                return Err(e);
            }
        };
        if resp.is_success() {
            debug!(
                "attempt {} succeeded with status {}",
                state.attempts, resp.status
            );
            return Ok(resp.body);
        }
        let err = classify_error(resp.status, &resp.body);
        if !err.is_retryable() {
            debug!(
                "attempt {} failed with status {}: {}",
                state.attempts, resp.status, err
            );
            return Err(err);
        }
        match state.next_delay(config) {
            Some(d) => {
                debug!(
                    "attempt {} throttled ({:?}), retrying in {:?}",
                    state.attempts, err.code, d
                );
                tokio::time::sleep(d).await;
            }
            None => {
                warn!(
                    "giving up after {} attempts: backoff reached {:?}: {}",
                    state.attempts, config.max_delay, err
                );
                return Err(err);
            }
        }
    }
}
