//! Driver module.
//!
//! This module provides the entry point for reaching the user's Firefox.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Bound WebSocket server waiting for the extension |
//! | [`DriverBuilder`] | Fluent configuration builder |
//!
//! # Example
//!
//! ```no_run
//! use tabs_hist_export::{Driver, Result};
//!
//! # async fn example() -> Result<()> {
//! let driver = Driver::builder().port(9555).build().await?;
//! println!("Point the extension at {}", driver.ws_url());
//!
//! let browser = driver.connect().await?;
//! let tabs = browser.tabs(true).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for driver configuration.
pub mod builder;

/// Core driver implementation.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT, DriverBuilder};
pub use core::Driver;
