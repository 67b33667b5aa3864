//! The tab operations the history pipeline is written against.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;
use crate::identifiers::TabId;
use crate::protocol::{LoadStatus, TabInfo};

// ============================================================================
// TabScope
// ============================================================================

/// Which tabs an export run visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabScope {
    /// Every tab of every window.
    AllWindows,
    /// Only tabs of the focused window.
    CurrentWindow,
}

impl TabScope {
    /// Maps the `currentWindowOnly` option to a scope.
    #[inline]
    #[must_use]
    pub fn from_current_window_only(current_window_only: bool) -> Self {
        if current_window_only {
            Self::CurrentWindow
        } else {
            Self::AllWindows
        }
    }
}

// ============================================================================
// NavigationState
// ============================================================================

/// Observed URL and load status of a tab at one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// Current URL.
    pub url: String,
    /// Load status.
    pub status: LoadStatus,
}

impl From<TabInfo> for NavigationState {
    fn from(info: TabInfo) -> Self {
        Self {
            url: info.url,
            status: info.status,
        }
    }
}

// ============================================================================
// TabSource
// ============================================================================

/// Asynchronous access to browser tabs.
///
/// Every method may fail; the pipeline treats any failure as fatal for the
/// current run.
#[async_trait]
pub trait TabSource: Send + Sync {
    /// Lists tab ids in browser order.
    async fn enumerate(&self, scope: TabScope) -> Result<Vec<TabId>>;

    /// Brings a tab to the foreground.
    ///
    /// The returned info may carry a different id than requested.
    async fn activate(&self, tab: TabId) -> Result<TabInfo>;

    /// Reads the tab's current URL and load status.
    async fn state(&self, tab: TabId) -> Result<NavigationState>;

    /// Issues one "go back" step.
    async fn go_back(&self, tab: TabId) -> Result<()>;

    /// Issues one "go forward" step.
    async fn go_forward(&self, tab: TabId) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================
