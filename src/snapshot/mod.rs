use crate::error::StoreError;
use crate::registry::{Record, StateRegistry};
use std::fs::{self, File};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub mod format;

pub use format::{MissionFormat, NpcFormat, NpcRecord};


/// External text format of one registry kind
pub trait SnapshotFormat {
    type Value: Record;

    /// Human-readable kind name used in log lines
    const KIND: &'static str;

    /// Serialize the full ordered record set
    fn encode(registry: &StateRegistry<Self::Value>) -> serde_json::Result<String>;

    /// Parse a snapshot back into a registry, preserving file order
    fn decode(text: &str) -> serde_json::Result<StateRegistry<Self::Value>>;

    /// The single record a registry starts with when no snapshot exists
    fn bootstrap() -> (String, Self::Value);
}

/// How [`SnapshotStore::load_with_outcome`] obtained its registry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Parsed from an existing snapshot
    Loaded,
    /// No snapshot existed; the bootstrap record was created
    Bootstrapped,
    /// The snapshot exists but could not be read or parsed
    Failed,
}

/// File-backed snapshot of one registry.
///
/// The file is the only durable representation: every save rewrites it in
/// full, there is no incremental log.
pub struct SnapshotStore<F> {
    path: PathBuf,
    _format: PhantomData<F>,
}

impl<F: SnapshotFormat> SnapshotStore<F> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _format: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the snapshot file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read(&self) -> Result<Option<StateRegistry<F::Value>>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        F::decode(&text)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Load the registry, bootstrapping on first run.
    ///
    /// - Missing file: a registry holding only the bootstrap record is
    ///   created and written back immediately.
    /// - Unreadable or malformed file: an empty registry is returned and the
    ///   file is left as it is on disk.
    pub fn load(&self) -> StateRegistry<F::Value> {
        self.load_with_outcome().0
    }

    /// [`load`](Self::load), also reporting which path was taken
    pub fn load_with_outcome(&self) -> (StateRegistry<F::Value>, LoadOutcome) {
        match self.read() {
            Ok(Some(registry)) => {
                info!(
                    kind = F::KIND,
                    path = %self.path.display(),
                    records = registry.len(),
                    "Snapshot loaded"
                );
                (registry, LoadOutcome::Loaded)
            }
            Ok(None) => {
                warn!(
                    kind = F::KIND,
                    path = %self.path.display(),
                    "Snapshot file not found, creating default"
                );

                let (key, value) = F::bootstrap();
                let mut registry = StateRegistry::new();
                registry.upsert(key, value);

                match self.save(&registry) {
                    Ok(()) => info!(kind = F::KIND, "Default snapshot file created"),
                    Err(e) => error!(kind = F::KIND, error = %e, "Failed to write default snapshot"),
                }

                (registry, LoadOutcome::Bootstrapped)
            }
            Err(e) => {
                error!(
                    kind = F::KIND,
                    error = %e,
                    "Failed to load snapshot, starting empty"
                );
                (StateRegistry::new(), LoadOutcome::Failed)
            }
        }
    }

    /// Save the registry to disk.
    ///
    /// Uses atomic write: writes to .tmp file, fsyncs, then renames, so a
    /// later `load` never observes a half-written snapshot.
    pub fn save(&self, registry: &StateRegistry<F::Value>) -> Result<(), StoreError> {
        let json = F::encode(registry).map_err(|e| self.write_error(e.into()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let tmp_path = self.path.with_extension("tmp");

        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.sync_all()
        });

        if let Err(e) = written.and_then(|()| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.write_error(e));
        }

        info!(
            kind = F::KIND,
            path = %self.path.display(),
            records = registry.len(),
            "Snapshot saved"
        );

        Ok(())
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
