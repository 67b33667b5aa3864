//! Builder pattern for driver configuration.
//!
//! Provides a fluent API for configuring and creating [`Driver`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tabs_hist_export::Driver;
//!
//! # async fn example() -> tabs_hist_export::Result<()> {
//! let driver = Driver::builder()
//!     .port(9555)
//!     .connect_timeout(Duration::from_secs(120))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::error::{Error, Result};

use super::core::Driver;

// ============================================================================
// Constants
// ============================================================================

/// Port the companion extension dials by default.
pub const DEFAULT_PORT: u16 = 9555;

/// How long [`Driver::connect`] waits for the extension by default.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// DriverBuilder
// ============================================================================

/// Builder for configuring a [`Driver`] instance.
///
/// Use [`Driver::builder()`] to create a new builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverBuilder {
    /// Address to bind.
    ip: IpAddr,
    /// Port to bind, 0 for any.
    port: u16,
    /// Wait for the extension to connect and send READY.
    connect_timeout: Duration,
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

// ============================================================================
// DriverBuilder Implementation
// ============================================================================

impl DriverBuilder {
    /// Creates a builder bound to `127.0.0.1:9555`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the address to bind.
    ///
    /// Anything other than loopback exposes tab control to the network.
    #[inline]
    #[must_use]
    pub fn ip(mut self, ip: IpAddr) -> Self {
        self.ip = ip;
        self
    }

    /// Sets the port to bind. Use 0 to let the OS pick one.
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets how long to wait for the extension to connect.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Validates the configuration and binds the WebSocket server.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the connect timeout is zero
    /// - [`Error::Io`] if the port cannot be bound
    pub async fn build(self) -> Result<Driver> {
        self.validate()?;
        Driver::bind(self.ip, self.port, self.connect_timeout).await
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DriverBuilder {
    /// Validates the timeout configuration.
    fn validate(&self) -> Result<()> {
        if self.connect_timeout.is_zero() {
            return Err(Error::config(
                "Connect timeout must be greater than zero.\n\
                 Example: Driver::builder().connect_timeout(Duration::from_secs(30))",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
