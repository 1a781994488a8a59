use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::Storage;

/// Slots stored as `<base_path>/<key>.json`.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|e| {
            error!("Failed to create storage dir {}: {}", base_path.display(), e);
            StorageError::WriteFailed
        })?;
        info!("FileStorage initialized at {}", base_path.display());
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            error!("Rejected storage key {:?}", key);
            return Err(StorageError::WriteFailed);
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!("Failed to read slot {}: {}", path.display(), e);
                Err(StorageError::ReadFailed)
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        // Write next to the slot and rename so a crash never leaves half a file behind.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(|e| {
            error!("Failed to create slot file {}: {}", tmp.display(), e);
            StorageError::WriteFailed
        })?;
        f.write_all(value.as_bytes())
            .and_then(|_| f.sync_all())
            .map_err(|e| {
                error!("Failed to write slot file {}: {}", tmp.display(), e);
                StorageError::WriteFailed
            })?;
        fs::rename(&tmp, &path).map_err(|e| {
            error!("Failed to move {} into place: {}", tmp.display(), e);
            StorageError::WriteFailed
        })?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
