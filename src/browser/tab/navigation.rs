//! Tab activation and history navigation methods.

use tracing::debug;

use crate::error::Result;
use crate::protocol::{BrowsingContextCommand, Command, TabInfo, TabsCommand};

use super::Tab;

// ============================================================================
// Tab - Navigation
// ============================================================================

impl Tab {
    /// Navigates back in history.
    ///
    /// Resolves once the browser accepted the command, not when the
    /// previous page has loaded. At the first entry this is a no-op.
    pub async fn back(&self) -> Result<()> {
        debug!(tab_id = %self.inner.tab_id, "Navigating back");
        let command = Command::BrowsingContext(BrowsingContextCommand::GoBack);
        self.send_command(command).await?;
        Ok(())
    }

    /// Navigates forward in history.
    ///
    /// At the last entry this is a no-op.
    pub async fn forward(&self) -> Result<()> {
        debug!(tab_id = %self.inner.tab_id, "Navigating forward");
        let command = Command::BrowsingContext(BrowsingContextCommand::GoForward);
        self.send_command(command).await?;
        Ok(())
    }

    /// Reads the tab's URL, title and load status.
    pub async fn info(&self) -> Result<TabInfo> {
        let command = Command::Tabs(TabsCommand::Get);
        let info: TabInfo = self.send_command(command).await?.parse_result()?;

        debug!(tab_id = %self.inner.tab_id, url = %info.url, status = ?info.status, "Got tab info");
        Ok(info)
    }

    /// Makes this tab the active tab of its window.
    ///
    /// The returned info carries the id Firefox reports for the activated
    /// tab, which is not guaranteed to equal [`Tab::tab_id`].
    pub async fn activate(&self) -> Result<TabInfo> {
        debug!(tab_id = %self.inner.tab_id, "Activating tab");
        let command = Command::Tabs(TabsCommand::Activate);
        let info: TabInfo = self.send_command(command).await?.parse_result()?;

        debug!(tab_id = %info.tab_id, title = %info.title, "Tab activated");
        Ok(info)
    }
}
