//! Tabs history export - dump the back/forward history of every Firefox tab.
//!
//! Firefox offers no API that lists a tab's session history. This library
//! recovers it by stepping each tab back to its earliest entry, then forward
//! to its latest while recording every URL, and finally returning the tab
//! to where it started. The collected lists are exported as one JSON file.
//!
//! # Architecture
//!
//! The library follows a client-server model:
//!
//! - **Local End (Rust)**: Binds a WebSocket server and runs the export
//! - **Remote End (Extension)**: Runs in the user's Firefox, executes tab
//!   commands (`tabs.query`, `browsingContext.goBack`, ...)
//!
//! Key design principles:
//!
//! - Protocol uses `module.methodName` format (BiDi-inspired)
//! - The pipeline is written against traits ([`TabSource`], [`Notifier`],
//!   [`SettingsStore`], [`ExportSink`]) so it runs without a browser in tests
//! - One run at a time, one tab at a time; the first failure ends the run
//!
//! # Quick Start
//!
//! ```no_run
//! use tabs_hist_export::{
//!     DirectorySink, Driver, Exporter, JsonFileStore, Result, RunOutcome,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let driver = Driver::builder().port(9555).build().await?;
//!     let browser = driver.connect().await?;
//!
//!     let exporter = Exporter::new(
//!         browser.clone(),
//!         JsonFileStore::new("settings.json"),
//!         browser.clone(),
//!         DirectorySink::downloads(),
//!     );
//!
//!     if let RunOutcome::Exported(report) = exporter.run().await? {
//!         println!("Exported {} tabs to {:?}", report.dataset.len(), report.delivery);
//!     }
//!
//!     browser.close();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | Connected session: [`Browser`], [`Tab`] |
//! | [`driver`] | Server binding and configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`export`] | Export runs: [`Exporter`], options, log, sink |
//! | [`history`] | History scanning and restoring |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | WebSocket message types (internal) |
//! | [`storage`] | Persisted settings |
//! | [`transport`] | WebSocket transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Browser entities: Browser, Tab.
pub mod browser;

/// Driver factory and configuration.
///
/// Use [`Driver::builder()`] to create a configured driver instance.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Export runs and their collaborators.
pub mod export;

/// Discovering and restoring tab history.
pub mod history;

/// Type-safe identifiers for browser entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// WebSocket protocol message types.
///
/// Internal module defining command/response structures.
pub mod protocol;

/// Persisted key/value settings.
pub mod storage;

/// WebSocket transport layer.
///
/// Internal module handling WebSocket server and connection management.
pub mod transport;

// ============================================================================
// Constants
// ============================================================================

/// Name shown in notification titles.
pub const DISPLAY_NAME: &str = "Tabs History Export";

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{Browser, Tab};

// Driver types
pub use driver::{Driver, DriverBuilder};

// Error types
pub use error::{Error, Result, Stage};

// Export types
pub use export::{
    Delivery, DirectorySink, ExportDataset, ExportReport, ExportSink, Exporter, Notification,
    Notifier, RunOptions, RunOutcome, TabExportRecord, TracingNotifier,
};

// History types
pub use history::{NavigationState, ScanResult, TabScope, TabSource};

// Identifier types
pub use identifiers::{RequestId, SessionId, TabId};

// Storage types
pub use storage::{JsonFileStore, MemoryStore, SettingsStore};
