//! Storage subsystem
//!
//! Client-side persistence for generated stickers.
//!
//! Components:
//! - `storage_trait`: the `Storage` trait, a named-slot key/value API.
//! - `file_storage`: filesystem-backed slots, one JSON file per key.
//! - `memory_storage`: in-process slots with an optional byte quota.
//! - `sticker_store`: the capped, newest-first sticker collection persisted in one slot.

pub mod file_storage;
pub mod memory_storage;
pub mod sticker_store;
pub mod storage_trait;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use sticker_store::{StickerStore, MAX_STICKERS, STICKERS_KEY};
pub use storage_trait::Storage;
