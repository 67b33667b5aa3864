//! Returning a tab to the history entry it started on.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::TabId;

use super::scanner::ScanResult;
use super::source::TabSource;

// ============================================================================
// Restorer
// ============================================================================

/// Back steps needed after a backward then forward scan.
#[inline]
#[must_use]
pub fn net_displacement(backward: &ScanResult, forward: &ScanResult) -> i64 {
    backward.displacement + forward.displacement
}

/// Steps `tab` back `steps` times, sleeping `settle_delay` after each.
///
/// Zero or negative `steps` is a no-op. Load completion is not awaited
/// between steps. Returns the number of steps issued.
///
/// # Errors
///
/// Fails on the first rejected "go back".
pub async fn restore_position<S>(
    source: &S,
    tab: TabId,
    steps: i64,
    settle_delay: Duration,
) -> Result<u64>
where
    S: TabSource + ?Sized,
{
    let steps = u64::try_from(steps).unwrap_or(0);

    for _ in 0..steps {
        source.go_back(tab).await?;
        sleep(settle_delay).await;
    }

    debug!(tab_id = %tab, steps, "Restored original history position");
    Ok(steps)
}

// ============================================================================
// Tests
// ============================================================================
