//! File-backed storage backend.
//!
//! All keys of a profile live in a single JSON object (`storage.json`).
//! Every write rewrites the whole document through a temporary file and a
//! rename, so a crash mid-write leaves either the old or the new document.
//! A document that no longer parses is moved aside to `storage.json.corrupt`
//! by the next write, which then starts from an empty document.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{Storage, StorageError};

/// Name of the document inside the profile directory.
const DOCUMENT_NAME: &str = "storage.json";

type Document = BTreeMap<String, String>;

/// Storage persisted as a JSON document in a profile directory.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open (creating if needed) the storage of the profile at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: dir.join(DOCUMENT_NAME),
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, document: &Document) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, contents).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), keys = document.len(), "Storage document saved");
        Ok(())
    }

    /// Move an unparsable document out of the way.
    fn quarantine(&self, error: &serde_json::Error) -> Result<(), StorageError> {
        let aside = self.path.with_extension("json.corrupt");
        fs::rename(&self.path, &aside).map_err(|source| StorageError::Io {
            path: aside.clone(),
            source,
        })?;
        warn!(
            error = %error,
            moved_to = %aside.display(),
            "Corrupt storage document set aside; starting a new one"
        );
        Ok(())
    }

    fn modify(&self, apply: impl FnOnce(&mut Document)) -> Result<(), StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StorageError::Unavailable("file storage lock poisoned".to_string()))?;
        let mut document = match self.load() {
            Err(StorageError::Corrupt { source, .. }) => {
                self.quarantine(&source)?;
                Document::new()
            }
            other => other?,
        };
        apply(&mut document);
        self.save(&document)
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.modify(|document| {
            document.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.modify(|document| {
            document.remove(key);
        })
    }
}
