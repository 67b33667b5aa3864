//! Export runs.
//!
//! An [`Exporter`] ties the history pipeline to its collaborators:
//!
//! | Collaborator | Trait | Provided |
//! |--------------|-------|----------|
//! | Tabs | [`TabSource`](crate::history::TabSource) | [`Browser`](crate::Browser) |
//! | Settings | [`SettingsStore`](crate::storage::SettingsStore) | [`JsonFileStore`](crate::storage::JsonFileStore), [`MemoryStore`](crate::storage::MemoryStore) |
//! | Notifications | [`Notifier`] | [`Browser`](crate::Browser), [`TracingNotifier`] |
//! | Download | [`ExportSink`] | [`DirectorySink`] |
//!
//! # Example
//!
//! ```no_run
//! use tabs_hist_export::{Driver, Exporter, DirectorySink, JsonFileStore, RunOutcome};
//!
//! # async fn example() -> tabs_hist_export::Result<()> {
//! let driver = Driver::builder().port(9555).build().await?;
//! let browser = driver.connect().await?;
//!
//! let exporter = Exporter::new(
//!     browser.clone(),
//!     JsonFileStore::new("settings.json"),
//!     browser,
//!     DirectorySink::downloads(),
//! );
//!
//! if let RunOutcome::Exported(report) = exporter.run().await? {
//!     println!("{} tabs exported", report.dataset.len());
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod context;
mod exporter;
mod log;
mod notify;
mod options;
mod sink;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::{RunContext, RunPhase};
pub use exporter::{
    DOWNLOAD_UNAVAILABLE_MESSAGE, ExportReport, Exporter, OPTIONS_VISIT_REMINDER, RunOutcome,
    UNEXPECTED_FAILURE_MESSAGE, dry_run_urls,
};
pub use log::{LogLevel, RunLog};
pub use notify::{Notification, Notifier, TracingNotifier};
pub use options::{DEFAULT_PAGE_LOAD_WAIT_MS, OPTION_KEYS, RunOptions};
pub use sink::{
    Delivery, DirectorySink, ExportDataset, ExportSink, TabExportRecord, encode, export_file_name,
};
