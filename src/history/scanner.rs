//! Discovering a tab's linear history by stepping through it.
//!
//! There is no API that lists a tab's back/forward entries, so the scanners
//! infer the boundaries from side effects: they keep stepping in one
//! direction until a step no longer changes the URL.
//!
//! # Displacement convention
//!
//! Both counters start one step "ahead" of zero because the loop always
//! runs one terminal pass that does not move:
//!
//! | Scanner | Start | Per pass | Tab at entry `k` of `N` |
//! |---------|-------|----------|--------------------------|
//! | backward | `+1` | `-1` | `-k` |
//! | forward (from entry 0) | `-1` | `+1` | `N - 1` |
//!
//! Their sum is the number of back steps that return the tab from its last
//! entry to entry `k`.
//!
//! A history whose neighbouring entries share a URL ends the scan early;
//! only linear, distinct-URL history is modeled.

// ============================================================================
// Imports
// ============================================================================

use std::mem;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::TabId;

use super::source::TabSource;
use super::waiter::{WaitPolicy, wait_for_load};

// ============================================================================
// Types
// ============================================================================

/// Timing applied after every navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPacing {
    /// Fixed delay after issuing a step, before polling the load status.
    pub settle_delay: Duration,
    /// Load-status polling policy.
    pub wait: WaitPolicy,
}

impl StepPacing {
    /// Creates pacing with the given settle delay and default polling.
    #[inline]
    #[must_use]
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            settle_delay,
            wait: WaitPolicy::default(),
        }
    }
}

/// Outcome of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Tab the scan ran on.
    pub tab_id: TabId,
    /// Signed step count, see the module docs for the convention.
    pub displacement: i64,
    /// Backward: the earliest URL only. Forward: every entry, earliest first.
    pub urls: Vec<String>,
}

// ============================================================================
// Scanners
// ============================================================================

/// Steps `tab` back until its URL stops changing.
///
/// # Errors
///
/// Any tab source failure ends the scan.
pub async fn scan_backward<S>(source: &S, tab: TabId, pacing: StepPacing) -> Result<ScanResult>
where
    S: TabSource + ?Sized,
{
    let mut displacement: i64 = 1;
    let mut url = source.state(tab).await?.url;
    let mut previous: Option<String> = None;

    while previous.as_deref() != Some(url.as_str()) {
        source.go_back(tab).await?;
        let next = settle(source, tab, pacing).await?;
        previous = Some(mem::replace(&mut url, next));
        displacement -= 1;
    }

    debug!(tab_id = %tab, displacement, url = %url, "Reached earliest history entry");

    Ok(ScanResult {
        tab_id: tab,
        displacement,
        urls: vec![url],
    })
}

/// Steps `tab` forward until its URL stops changing, recording each URL.
///
/// Meant to run right after [`scan_backward`], so the first recorded URL is
/// the earliest entry.
///
/// # Errors
///
/// Any tab source failure ends the scan.
pub async fn scan_forward<S>(source: &S, tab: TabId, pacing: StepPacing) -> Result<ScanResult>
where
    S: TabSource + ?Sized,
{
    let mut displacement: i64 = -1;
    let mut url = source.state(tab).await?.url;
    let mut previous: Option<String> = None;
    let mut visited = Vec::new();

    while previous.as_deref() != Some(url.as_str()) {
        visited.push(url.clone());
        source.go_forward(tab).await?;
        let next = settle(source, tab, pacing).await?;
        previous = Some(mem::replace(&mut url, next));
        displacement += 1;
    }

    debug!(tab_id = %tab, displacement, entries = visited.len(), "Reached latest history entry");

    Ok(ScanResult {
        tab_id: tab,
        displacement,
        urls: visited,
    })
}

/// Waits out the settle delay and the page load, returning the new URL.
async fn settle<S>(source: &S, tab: TabId, pacing: StepPacing) -> Result<String>
where
    S: TabSource + ?Sized,
{
    sleep(pacing.settle_delay).await;
    Ok(wait_for_load(source, tab, pacing.wait).await?.url)
}

// ============================================================================
// Tests
// ============================================================================
