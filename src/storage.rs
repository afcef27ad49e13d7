//! On-disk storage for JSON documents.
//!
//! Each document is a JSON array kept in its own file:
//! ```text
//! <DATA_DIR>/
//!   products.json
//!   <id>.json
//! ```

use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

/// Errors that can occur during document storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// A stored file that is not a JSON array.
    CorruptDocument(PathBuf, String),
    /// Invalid document ID (e.g., contains path separators).
    InvalidId(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::CorruptDocument(path, e) => {
                write!(f, "Stored document {} is not a JSON array: {}", path.display(), e)
            }
            StorageError::InvalidId(id) => write!(f, "Invalid document ID: {}", id),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Stores one JSON array per document ID under a data directory.
#[derive(Debug, Clone)]
pub struct DocumentStorage {
    data_dir: PathBuf,
}

impl DocumentStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Rejects IDs that could escape the data directory.
    pub fn validate_id(id: &str) -> Result<(), StorageError> {
        if id.is_empty()
            || id.contains('/')
            || id.contains('\\')
            || id.contains("..")
            || id.starts_with('.')
        {
            return Err(StorageError::InvalidId(id.to_string()));
        }
        Ok(())
    }

    fn doc_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", id))
    }

    /// Loads a document. Returns `Ok(None)` if it was never written.
    pub fn load(&self, id: &str) -> Result<Option<Vec<Value>>, StorageError> {
        Self::validate_id(id)?;

        let path = self.doc_path(id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(path, e)),
        };

        serde_json::from_str::<Vec<Value>>(&contents)
            .map(Some)
            .map_err(|e| StorageError::CorruptDocument(path, e.to_string()))
    }

    /// Replaces a document wholesale.
    ///
    /// Creates the data directory if it doesn't exist.
    pub fn save(&self, id: &str, items: &[Value]) -> Result<(), StorageError> {
        Self::validate_id(id)?;

        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.doc_path(id);
        let bytes = serde_json::to_vec(items)
            .map_err(|e| StorageError::CorruptDocument(path.clone(), e.to_string()))?;

        // Write atomically using temp file + rename
        let temp_path = path.with_extension("json.tmp");

        let mut file =
            File::create(&temp_path).map_err(|e| StorageError::IoError(temp_path.clone(), e))?;
        file.write_all(&bytes)
            .map_err(|e| StorageError::IoError(temp_path.clone(), e))?;
        file.sync_all()
            .map_err(|e| StorageError::IoError(temp_path.clone(), e))?;

        fs::rename(&temp_path, &path).map_err(|e| StorageError::IoError(path, e))?;

        tracing::debug!(id, count = items.len(), "Saved document");
        Ok(())
    }
}
