//! [`Browser`] as the export pipeline's tab source and notifier.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;
use crate::export::{Notification, Notifier};
use crate::history::{NavigationState, TabScope, TabSource};
use crate::identifiers::TabId;
use crate::protocol::TabInfo;

use super::Browser;

// ============================================================================
// TabSource
// ============================================================================

#[async_trait]
impl TabSource for Browser {
    async fn enumerate(&self, scope: TabScope) -> Result<Vec<TabId>> {
        let tabs = self.tabs(scope == TabScope::CurrentWindow).await?;
        Ok(tabs.into_iter().map(|info| info.tab_id).collect())
    }

    async fn activate(&self, tab: TabId) -> Result<TabInfo> {
        self.tab(tab).activate().await
    }

    async fn state(&self, tab: TabId) -> Result<NavigationState> {
        Ok(self.tab(tab).info().await?.into())
    }

    async fn go_back(&self, tab: TabId) -> Result<()> {
        self.tab(tab).back().await
    }

    async fn go_forward(&self, tab: TabId) -> Result<()> {
        self.tab(tab).forward().await
    }
}

// ============================================================================
// Notifier
// ============================================================================

#[async_trait]
impl Notifier for Browser {
    async fn notify(&self, kind: Notification, title: &str, message: &str) {
        if let Err(e) = Browser::notify(self, kind.id(), title, message).await {
            warn!(error = %e, id = kind.id(), "Failed to show notification");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
