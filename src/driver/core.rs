//! Driver: the bound server the companion extension connects to.
//!
//! # Example
//!
//! ```no_run
//! use tabs_hist_export::Driver;
//!
//! # async fn example() -> tabs_hist_export::Result<()> {
//! let driver = Driver::builder().build().await?;
//! let browser = driver.connect().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use tracing::{debug, info};

use crate::browser::Browser;
use crate::error::{Error, Result};
use crate::identifiers::{SessionId, TabId};
use crate::transport::PendingServer;

use super::builder::DriverBuilder;

// ============================================================================
// Driver
// ============================================================================

/// A bound WebSocket server waiting for the companion extension.
///
/// The driver is responsible for:
/// - Owning the listening socket
/// - Accepting the extension and completing the READY handshake
/// - Handing out the connected [`Browser`]
pub struct Driver {
    /// Bound, not yet connected, server.
    server: PendingServer,
    /// Wait for the extension to connect.
    connect_timeout: Duration,
}

// ============================================================================
// Driver - Display
// ============================================================================

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("ws_url", &self.ws_url())
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Driver - Public API
// ============================================================================

impl Driver {
    /// Creates a configuration builder for the driver.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Returns the URL the extension must dial.
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        self.server.ws_url()
    }

    /// Returns the bound port.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.server.port()
    }

    /// Returns the configured connect timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Waits for the extension to connect and returns the session.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the extension does not connect in time
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    /// - [`Error::Protocol`] if the READY handshake carries invalid ids
    pub async fn connect(self) -> Result<Browser> {
        let port = self.server.port();
        info!(url = %self.server.ws_url(), timeout_ms = self.connect_timeout.as_millis() as u64, "Waiting for extension");

        let (connection, ready_data) = self.server.accept(self.connect_timeout).await?;

        let tab_id = TabId::new(ready_data.tab_id)
            .ok_or_else(|| Error::protocol("Invalid tab_id in READY message"))?;
        let session_id = SessionId::from_u32(ready_data.session_id)
            .ok_or_else(|| Error::protocol("Invalid session_id in READY message"))?;
        debug!(session_id = %session_id, tab_id = %tab_id, "Browser IDs assigned");

        let browser = Browser::new(connection, session_id, tab_id, port);
        info!(session_id = %session_id, "Extension connected");

        Ok(browser)
    }
}

// ============================================================================
// Driver - Internal API
// ============================================================================

impl Driver {
    /// Binds the WebSocket server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub(crate) async fn bind(ip: IpAddr, port: u16, connect_timeout: Duration) -> Result<Self> {
        let server = PendingServer::bind(ip, port).await?;

        info!(port = server.port(), "Driver initialized with WebSocket server");

        Ok(Self {
            server,
            connect_timeout,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::browser::testing::FakeExtension;

    #[test]
    fn test_builder_returns_driver_builder() {
        let _builder = Driver::builder();
    }

    #[test]
    fn test_driver_is_debug() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<Driver>();
    }

    #[tokio::test]
    async fn test_connect_times_out_without_extension() {
        let driver = Driver::builder()
            .port(0)
            .connect_timeout(Duration::from_millis(50))
            .build()
            .await
            .expect("build");

        let err = driver.connect().await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_connect_uses_ready_ids() {
        let driver = Driver::builder().port(0).build().await.expect("build");
        let port = driver.port();
        let extension = FakeExtension::spawn(driver.ws_url(), 4, 9, Vec::new());

        let browser = driver.connect().await.expect("connect");

        assert_eq!(browser.initial_tab_id().as_u32(), 4);
        assert_eq!(browser.session_id().as_u32(), 9);
        assert_eq!(browser.port(), port);

        browser.close();
        extension.abort();
    }
}
