use std::io;
use std::path::PathBuf;

/// Errors surfaced by registries and snapshot stores.
///
/// Nothing here is fatal: callers decide whether to log, retry or ignore.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Targeted mutation on a key the registry does not hold
    #[error("no record named '{key}'")]
    NotFound { key: String },

    /// Snapshot file exists but could not be read
    #[error("failed to read snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot file contents are malformed
    #[error("failed to parse snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot could not be written or swapped into place
    #[error("failed to write snapshot {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn not_found(key: impl Into<String>) -> Self {
        StoreError::NotFound { key: key.into() }
    }
}
