//! Browser tab control.
//!
//! Each [`Tab`] is a handle to one Firefox tab of a connected [`Browser`].
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Tab struct and accessors |
//! | `navigation` | Activation, state, history |
//!
//! # Example
//!
//! ```ignore
//! let tab = browser.tab(tab_id);
//!
//! tab.activate().await?;
//! tab.back().await?;
//! let info = tab.info().await?;
//! ```
//!
//! [`Browser`]: crate::browser::Browser

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod navigation;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Tab;
