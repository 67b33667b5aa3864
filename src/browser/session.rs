//! Connected browser session.
//!
//! A [`Browser`] owns the WebSocket connection to the companion extension
//! running inside the user's Firefox. Unlike a spawned automation window it
//! sees every tab the user has open.
//!
//! # Example
//!
//! ```no_run
//! use tabs_hist_export::Driver;
//!
//! # async fn example() -> tabs_hist_export::Result<()> {
//! let driver = Driver::builder().port(9555).build().await?;
//! let browser = driver.connect().await?;
//!
//! for info in browser.tabs(true).await? {
//!     println!("{} {}", info.tab_id, info.url);
//! }
//!
//! browser.close();
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::Result;
use crate::identifiers::{SessionId, TabId};
use crate::protocol::{
    Command, NotificationsCommand, Request, Response, SessionCommand, TabInfo, TabsCommand,
};
use crate::transport::Connection;

use super::Tab;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a browser session.
pub(crate) struct BrowserInner {
    /// Session ID reported in READY.
    pub session_id: SessionId,
    /// WebSocket connection.
    pub connection: Connection,
    /// Tab that was active when the extension connected.
    pub initial_tab_id: TabId,
    /// WebSocket port number.
    pub port: u16,
}

/// Payload of a `tabs.query` response.
#[derive(Debug, Deserialize)]
struct TabList {
    tabs: Vec<TabInfo>,
}

// ============================================================================
// Browser
// ============================================================================

/// A handle to the user's Firefox, reached through the companion extension.
///
/// Cheap to clone; all clones share one connection.
#[derive(Clone)]
pub struct Browser {
    /// Shared inner state.
    pub(crate) inner: Arc<BrowserInner>,
}

// ============================================================================
// Browser - Display
// ============================================================================

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("session_id", &self.inner.session_id)
            .field("initial_tab_id", &self.inner.initial_tab_id)
            .field("port", &self.inner.port)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Browser - Constructor
// ============================================================================

impl Browser {
    /// Creates a new browser handle.
    pub(crate) fn new(
        connection: Connection,
        session_id: SessionId,
        initial_tab_id: TabId,
        port: u16,
    ) -> Self {
        debug!(session_id = %session_id, tab_id = %initial_tab_id, port, "Browser session created");

        Self {
            inner: Arc::new(BrowserInner {
                session_id,
                connection,
                initial_tab_id,
                port,
            }),
        }
    }
}

// ============================================================================
// Browser - Accessors
// ============================================================================

impl Browser {
    /// Returns the session ID.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.inner.session_id
    }

    /// Returns the tab that was active when the extension connected.
    #[inline]
    #[must_use]
    pub fn initial_tab_id(&self) -> TabId {
        self.inner.initial_tab_id
    }

    /// Returns the WebSocket port for this session.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Returns a handle to the given tab.
    ///
    /// No round trip; the tab is validated by the first command sent to it.
    #[must_use]
    pub fn tab(&self, tab_id: TabId) -> Tab {
        Tab::new(tab_id, self.clone())
    }
}

// ============================================================================
// Browser - Commands
// ============================================================================

impl Browser {
    /// Lists tabs in browser order.
    ///
    /// # Arguments
    ///
    /// * `current_window` - Only tabs of the focused window
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn tabs(&self, current_window: bool) -> Result<Vec<TabInfo>> {
        debug!(current_window, "Querying tabs");
        let command = Command::Tabs(TabsCommand::Query { current_window });
        let list: TabList = self.send_command(command).await?.parse_result()?;

        debug!(count = list.tabs.len(), "Got tabs");
        Ok(list.tabs)
    }

    /// Shows a desktop notification through the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension rejects the notification.
    pub async fn notify(&self, id: &str, title: &str, message: &str) -> Result<()> {
        debug!(id, title, "Creating notification");
        let command = Command::Notifications(NotificationsCommand::Create {
            id: id.to_string(),
            title: title.to_string(),
            message: message.to_string(),
        });
        self.send_command(command).await?;
        Ok(())
    }

    /// Gets the extension's session status.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension does not answer.
    pub async fn status(&self) -> Result<Value> {
        let command = Command::Session(SessionCommand::Status);
        self.send_command(command).await?.into_result()
    }
}

// ============================================================================
// Browser - Lifecycle
// ============================================================================

impl Browser {
    /// Closes the connection to the extension.
    ///
    /// Pending requests fail with `ConnectionClosed`.
    pub fn close(&self) {
        self.inner.connection.shutdown();
        info!(session_id = %self.inner.session_id, "Browser session closed");
    }
}

// ============================================================================
// Browser - Internal
// ============================================================================

impl Browser {
    /// Sends a command addressed to the initial tab.
    pub(crate) async fn send_command(&self, command: Command) -> Result<Response> {
        let request = Request::new(self.inner.initial_tab_id, command);
        self.inner.connection.send(request).await?.ensure_success()
    }
}

// ============================================================================
// Tests
// ============================================================================
