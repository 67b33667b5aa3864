//! Core Tab struct and accessors.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::identifiers::TabId;
use crate::protocol::{Command, Request, Response};

use crate::browser::Browser;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a tab.
pub(crate) struct TabInner {
    /// Tab ID.
    pub tab_id: TabId,
    /// Owning browser session.
    pub browser: Browser,
}

// ============================================================================
// Tab
// ============================================================================

/// A handle to a browser tab.
///
/// Tabs provide methods for activation and history navigation.
#[derive(Clone)]
pub struct Tab {
    pub(crate) inner: Arc<TabInner>,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("tab_id", &self.inner.tab_id)
            .field("session_id", &self.inner.browser.session_id())
            .finish_non_exhaustive()
    }
}

impl Tab {
    /// Creates a new tab handle.
    pub(crate) fn new(tab_id: TabId, browser: Browser) -> Self {
        Self {
            inner: Arc::new(TabInner { tab_id, browser }),
        }
    }
}

// ============================================================================
// Tab - Accessors
// ============================================================================

impl Tab {
    /// Returns the tab ID.
    #[inline]
    #[must_use]
    pub fn tab_id(&self) -> TabId {
        self.inner.tab_id
    }

    /// Returns the owning browser session.
    #[inline]
    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.inner.browser
    }
}

// ============================================================================
// Tab - Internal
// ============================================================================

impl Tab {
    /// Sends a command addressed to this tab and returns the response.
    ///
    /// Error responses from the extension are converted into errors.
    pub(crate) async fn send_command(&self, command: Command) -> Result<Response> {
        let request = Request::new(self.inner.tab_id, command);
        self.inner
            .browser
            .inner
            .connection
            .send(request)
            .await?
            .ensure_success()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::Tab;

    #[test]
    fn test_tab_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Tab>();
    }

    #[test]
    fn test_tab_is_debug() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<Tab>();
    }
}
