use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::sticker::StickerRecord;
use crate::storage::storage_trait::Storage;

/// Slot holding the JSON array of stickers, newest first.
pub const STICKERS_KEY: &str = "stickers";

/// Number of stickers kept; adding past it drops the oldest.
pub const MAX_STICKERS: usize = 20;

/// The sticker gallery.
///
/// Holds the records in memory, newest first, and mirrors every mutation to
/// the `stickers` slot of the backing storage. A failed write is logged and
/// the in-memory gallery stays authoritative until the next successful one.
pub struct StickerStore {
    stickers: Vec<StickerRecord>,
    storage: Arc<dyn Storage>,
}

impl StickerStore {
    /// Reads the persisted gallery.
    ///
    /// A missing, unreadable or malformed slot yields an empty gallery. Repeated
    /// ids keep only their first, newest, occurrence.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let stickers = match storage.get_item(STICKERS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<StickerRecord>>(&raw) {
                Ok(list) => {
                    let mut seen = HashSet::new();
                    let mut unique: Vec<StickerRecord> = list
                        .into_iter()
                        .filter(|s| {
                            let first = seen.insert(s.id.clone());
                            if !first {
                                warn!("Dropping duplicate sticker {} from the saved gallery", s.id);
                            }
                            first
                        })
                        .collect();
                    unique.truncate(MAX_STICKERS);
                    unique
                }
                Err(e) => {
                    warn!("Discarding malformed sticker gallery: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load stickers from storage: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} stickers", stickers.len());
        Self { stickers, storage }
    }

    /// Prepends `record`, keeps the newest [`MAX_STICKERS`] and persists.
    pub fn add(&mut self, record: StickerRecord) -> &[StickerRecord] {
        // ids are unique; a record re-added under an existing id replaces it
        self.stickers.retain(|s| s.id != record.id);
        self.stickers.insert(0, record);
        if self.stickers.len() > MAX_STICKERS {
            for evicted in self.stickers.drain(MAX_STICKERS..) {
                debug!("Evicted sticker {} (capacity {})", evicted.id, MAX_STICKERS);
            }
        }
        self.persist();
        &self.stickers
    }

    /// Removes the sticker with `id`, if present, and persists.
    pub fn remove(&mut self, id: &str) -> &[StickerRecord] {
        let before = self.stickers.len();
        self.stickers.retain(|s| s.id != id);
        if self.stickers.len() == before {
            debug!("No sticker {} to remove", id);
        }
        self.persist();
        &self.stickers
    }

    pub fn get(&self, id: &str) -> Option<&StickerRecord> {
        self.stickers.iter().find(|s| s.id == id)
    }

    pub fn stickers(&self) -> &[StickerRecord] {
        &self.stickers
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.stickers) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to serialize stickers: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set_item(STICKERS_KEY, &raw) {
            error!(
                "Failed to save stickers to storage (quota exceeded?): {}",
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticker::record::fixture;
    use crate::sticker::{ImageData, StickerStyle};
    use crate::storage::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    fn memory_store() -> (Arc<MemoryStorage>, StickerStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = StickerStore::load(storage.clone());
        (storage, store)
    }

    fn ids(list: &[StickerRecord]) -> Vec<String> {
        list.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_empty_storage_loads_empty() {
        let (_, store) = memory_store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_is_newest_first_and_capped() {
        let (_, mut store) = memory_store();
        for i in 0..45 {
            let record = fixture(&format!("sticker {}", i));
            let id = record.id.clone();
            let list = store.add(record);
            assert!(list.len() <= MAX_STICKERS);
            assert_eq!(list[0].id, id);
        }
        assert_eq!(store.len(), MAX_STICKERS);
        assert_eq!(store.stickers()[0].prompt, "sticker 44");
        assert_eq!(store.stickers()[MAX_STICKERS - 1].prompt, "sticker 25");
    }

    #[test]
    fn test_twenty_first_add_drops_oldest() {
        let (_, mut store) = memory_store();
        let oldest = fixture("oldest");
        let oldest_id = oldest.id.clone();
        store.add(oldest);
        for i in 1..MAX_STICKERS {
            store.add(fixture(&format!("s{}", i)));
        }
        assert_eq!(store.len(), MAX_STICKERS);
        assert!(store.get(&oldest_id).is_some());

        let newest = fixture("newest");
        let newest_id = newest.id.clone();
        let list = store.add(newest);
        assert_eq!(list.len(), MAX_STICKERS);
        assert_eq!(list[0].id, newest_id);
        assert!(store.get(&oldest_id).is_none());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (_, mut store) = memory_store();
        store.add(fixture("a"));
        store.add(fixture("b"));
        let before = store.stickers().to_vec();
        let after = store.remove("no-such-id").to_vec();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_keeps_order() {
        let (_, mut store) = memory_store();
        let a = fixture("a");
        let b = fixture("b");
        let c = fixture("c");
        let (a_id, b_id, c_id) = (a.id.clone(), b.id.clone(), c.id.clone());
        store.add(a);
        store.add(b);
        store.add(c);
        let list = store.remove(&b_id);
        assert_eq!(ids(list), vec![c_id, a_id]);
    }

    #[test]
    fn test_every_mutation_persists() {
        let (storage, mut store) = memory_store();
        let record = fixture("persisted");
        let id = record.id.clone();
        store.add(record);
        let raw = storage.get_item(STICKERS_KEY).unwrap().unwrap();
        assert!(raw.contains(&id));

        store.remove(&id);
        let raw = storage.get_item(STICKERS_KEY).unwrap().unwrap();
        assert_eq!(raw, "[]");
    }

    #[test]
    fn test_round_trip_through_file_storage() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(dir.path()).unwrap());
        let mut store = StickerStore::load(storage.clone());
        for i in 0..MAX_STICKERS {
            store.add(fixture(&format!("round trip {}", i)));
        }
        let saved = store.stickers().to_vec();

        let reloaded = StickerStore::load(storage);
        assert_eq!(reloaded.stickers(), saved.as_slice());
    }

    #[test]
    fn test_malformed_slot_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(STICKERS_KEY, "{not json").unwrap();
        assert!(StickerStore::load(storage.clone()).is_empty());

        storage
            .set_item(STICKERS_KEY, r#"[{"id": 3, "prompt": "wrong shape"}]"#)
            .unwrap();
        assert!(StickerStore::load(storage).is_empty());
    }

    #[test]
    fn test_image_without_mime_type_survives_reload() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(dir.path()).unwrap());
        let mut store = StickerStore::load(storage.clone());
        for i in 0..5 {
            store.add(fixture(&format!("good {}", i)));
        }
        store.add(StickerRecord::new(
            ImageData::new("", "aGVsbG8="),
            "untyped",
            StickerStyle::Kawaii,
        ));
        let saved = store.stickers().to_vec();

        let reloaded = StickerStore::load(storage);
        assert_eq!(reloaded.len(), 6);
        assert_eq!(reloaded.stickers(), saved.as_slice());
        assert_eq!(reloaded.stickers()[0].image_data.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_duplicate_ids_collapse_on_load() {
        let a = fixture("a");
        let b = fixture("b");
        let mut stale = a.clone();
        stale.prompt = "older copy of a".to_string();
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(
                STICKERS_KEY,
                &serde_json::to_string(&vec![a.clone(), b.clone(), stale]).unwrap(),
            )
            .unwrap();

        let mut store = StickerStore::load(storage);
        assert_eq!(ids(store.stickers()), vec![a.id.clone(), b.id.clone()]);
        assert_eq!(store.get(&a.id).unwrap().prompt, "a");

        let list = store.remove(&a.id);
        assert_eq!(ids(list), vec![b.id]);
    }

    #[test]
    fn test_quota_failure_keeps_memory_state() {
        let storage = Arc::new(MemoryStorage::with_quota(64));
        let mut store = StickerStore::load(storage.clone());
        let record = fixture("far too large for a sixty-four byte quota");
        let id = record.id.clone();

        let list = store.add(record);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, id);
        assert_eq!(storage.get_item(STICKERS_KEY).unwrap(), None);

        // the next successful write catches storage up
        store.remove(&id);
        assert_eq!(storage.get_item(STICKERS_KEY).unwrap().as_deref(), Some("[]"));
    }
}
