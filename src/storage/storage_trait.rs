//! Storage Trait
//!
//! This module defines the `Storage` trait, a small key/value interface over
//! named slots holding UTF-8 text.
//!
//! Implementors are responsible for:
//! - Returning `Ok(None)` for slots that were never written
//! - Replacing a slot's whole value on write
//! - Reporting capacity problems as `StorageError::QuotaExceeded`

use crate::error_handling::types::StorageError;

/// Named-slot persistence used by the sticker store.
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
