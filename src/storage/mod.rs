//! Persisted key/value settings.
//!
//! The exporter keeps its options, the run log and the last export in a
//! small key/value store, mirroring the extension's `storage.local`.
//!
//! | Key | Value |
//! |-----|-------|
//! | [`OPTIONS_KEY`] | `RunOptions` object |
//! | [`HAS_VISITED_OPTIONS_KEY`] | `bool` |
//! | [`LOGS_KEY`] | array of log lines |
//! | [`EXPORT_DATA_KEY`] | serialized export text |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

// ============================================================================
// Keys
// ============================================================================

/// Run options.
pub const OPTIONS_KEY: &str = "options";

/// Set once the user has opened the options surface.
pub const HAS_VISITED_OPTIONS_KEY: &str = "hasVisitedOptions";

/// Run log lines.
pub const LOGS_KEY: &str = "logs";

/// Text of the most recent export.
pub const EXPORT_DATA_KEY: &str = "TAB_HIST_EXPORT_DATA";

// ============================================================================
// SettingsStore
// ============================================================================

/// Asynchronous JSON key/value persistence.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Reads a value; `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

// ============================================================================
// Typed Access
// ============================================================================

/// A value read from the store, or the caller's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    /// `true` if the key held a non-null value.
    pub found: bool,
    /// Stored value or the default.
    pub value: T,
}

/// Reads `key` as `T`, falling back to `default` when it is absent or null.
///
/// # Errors
///
/// Fails if the store cannot be read or the value does not decode as `T`.
pub async fn load<S, T>(store: &S, key: &str, default: T) -> Result<Loaded<T>>
where
    S: SettingsStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(value) if !value.is_null() => Ok(Loaded {
            found: true,
            value: serde_json::from_value(value)?,
        }),
        _ => Ok(Loaded {
            found: false,
            value: default,
        }),
    }
}

/// Writes `value` under `key`.
///
/// # Errors
///
/// Fails if the value cannot be encoded or the store cannot be written.
pub async fn save<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: SettingsStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.set(key, serde_json::to_value(value)?).await
}

// ============================================================================
// Tests
// ============================================================================
