//! Serializing the collected history and handing it to the user.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Error, Result};

// ============================================================================
// Dataset
// ============================================================================

/// URLs of one tab, earliest history entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabExportRecord(pub Vec<String>);

impl TabExportRecord {
    /// The URLs.
    #[inline]
    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for TabExportRecord {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

/// One record per processed tab, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportDataset(pub Vec<TabExportRecord>);

impl ExportDataset {
    /// Creates an empty dataset.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    #[inline]
    pub fn push(&mut self, record: TabExportRecord) {
        self.0.push(record);
    }

    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no tab was recorded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The records.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[TabExportRecord] {
        &self.0
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Serializes the dataset, indented by four spaces when `pretty`.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn encode(dataset: &ExportDataset, pretty: bool) -> Result<String> {
    if !pretty {
        return Ok(serde_json::to_string(dataset)?);
    }

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    dataset.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::export(format!("non-UTF-8 JSON output: {e}")))
}

/// Download file name for an export taken at `at` (local time).
#[must_use]
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("tabs_hist_export_{}.json", at.format("%d-%m-%Y_%H-%M-%S"))
}

// ============================================================================
// ExportSink
// ============================================================================

/// Where the exported text ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Written to this file.
    Written(PathBuf),
    /// No download capability; the text is only in the settings store.
    Unavailable,
}

/// Delivers serialized export text to the user.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Delivers `text` under `file_name`.
    async fn deliver(&self, file_name: &str, text: &str) -> Result<Delivery>;
}

/// Sink that writes into a download directory.
///
/// Without a directory the sink reports [`Delivery::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct DirectorySink {
    dir: Option<PathBuf>,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Creates a sink writing into the user's download directory, if any.
    #[must_use]
    pub fn downloads() -> Self {
        Self {
            dir: dirs::download_dir(),
        }
    }

    /// Creates a sink with no download capability.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { dir: None }
    }

    /// Target directory.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

#[async_trait]
impl ExportSink for DirectorySink {
    async fn deliver(&self, file_name: &str, text: &str) -> Result<Delivery> {
        let Some(dir) = &self.dir else {
            debug!(file_name, "No download directory, leaving export in store");
            return Ok(Delivery::Unavailable);
        };

        fs::create_dir_all(dir).await.map_err(|e| {
            Error::export(format!("cannot create {}: {e}", dir.display()))
        })?;

        let path = dir.join(file_name);
        fs::write(&path, text)
            .await
            .map_err(|e| Error::export(format!("cannot write {}: {e}", path.display())))?;

        info!(path = %path.display(), bytes = text.len(), "Export written");
        Ok(Delivery::Written(path))
    }
}

// ============================================================================
// Tests
// ============================================================================
