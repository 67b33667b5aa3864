//! Browser entities module.
//!
//! This module provides the handles used to drive the user's Firefox:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Browser`] | Connected session (owns the WebSocket connection) |
//! | [`Tab`] | Browser tab |
//!
//! [`Browser`] also plugs into the export pipeline as its tab source and
//! notification sink.
//!
//! # Example
//!
//! ```no_run
//! use tabs_hist_export::{Driver, Result};
//!
//! # async fn example() -> Result<()> {
//! let driver = Driver::builder().build().await?;
//! let browser = driver.connect().await?;
//!
//! let tab = browser.tab(browser.initial_tab_id());
//! tab.back().await?;
//! let url = tab.info().await?.url;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Tab source and notifier implementations.
mod adapter;

/// Connected browser session.
pub mod session;

/// Browser tab control.
pub mod tab;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use session::Browser;
pub use tab::Tab;
