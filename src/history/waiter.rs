//! Waiting for a tab to finish loading.
//!
//! Firefox reports `status: "loading"` until the page load settles. The
//! waiter polls `tabs.get` on a short fixed interval, independent of the
//! configured page-load wait.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::trace;

use crate::error::{Error, Result};
use crate::identifiers::TabId;

use super::source::{NavigationState, TabSource};

// ============================================================================
// Constants
// ============================================================================

/// Delay between two load-status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ============================================================================
// WaitPolicy
// ============================================================================

/// How the waiter polls and when it gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between polls.
    pub poll_interval: Duration,
    /// Upper bound on the whole wait. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

impl WaitPolicy {
    /// Sets the overall wait limit.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }
}

// ============================================================================
// Waiter
// ============================================================================

/// Polls `tab` until its load status is complete and returns that state.
///
/// # Errors
///
/// Fails with the tab source's error, or [`Error::Timeout`] when the
/// policy's limit elapses first.
pub async fn wait_for_load<S>(source: &S, tab: TabId, policy: WaitPolicy) -> Result<NavigationState>
where
    S: TabSource + ?Sized,
{
    match policy.timeout {
        None => poll_until_complete(source, tab, policy.poll_interval).await,
        Some(limit) => timeout(limit, poll_until_complete(source, tab, policy.poll_interval))
            .await
            .map_err(|_| {
                Error::timeout(
                    format!("waiting for tab {tab} to load"),
                    limit.as_millis() as u64,
                )
            })?,
    }
}

async fn poll_until_complete<S>(
    source: &S,
    tab: TabId,
    poll_interval: Duration,
) -> Result<NavigationState>
where
    S: TabSource + ?Sized,
{
    loop {
        let state = source.state(tab).await?;
        if state.status.is_complete() {
            return Ok(state);
        }

        trace!(tab_id = %tab, url = %state.url, "Tab still loading");
        sleep(poll_interval).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
