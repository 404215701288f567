//! JSON-file key-value store.
//!
//! All keys live in one JSON object on disk. The file is read once on open
//! and rewritten in full on every `set`.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::port::KeyValueStore;

/// Durable store persisting to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file opens empty. A file that is not a JSON object of
    /// strings also opens empty and is overwritten on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "Order file is corrupt, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No order file yet");
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the map to a temp file, then rename it over the target.
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let cleanup = |err: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            Error::Storage(format!("{}: {err}", self.path.display()))
        };

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes()).map_err(cleanup)?;
        file.sync_all().map_err(cleanup)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist(&entries) {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "file"
    }
}
