use std::collections::HashMap;
use std::sync::Mutex;

use log::error;

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::Storage;

/// In-process slots, lost when the process exits.
///
/// An optional quota caps the total bytes held across all slots, the way a
/// browser caps local storage per origin.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().map_err(|_| {
            error!("Memory storage lock poisoned");
            StorageError::ReadFailed
        })?;
        Ok(slots.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| {
            error!("Memory storage lock poisoned");
            StorageError::WriteFailed
        })?;
        if let Some(quota) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let size = others + key.len() + value.len();
            if size > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    quota,
                });
            }
        }
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
