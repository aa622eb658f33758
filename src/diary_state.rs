use crate::diary_entry::{DateKey, DiaryEntry};
use crate::errors::StoreError;
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    entries: &'a BTreeMap<DateKey, DiaryEntry>,
}

/// Accepted payload shapes. An untagged map is version 0.
#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Versioned {
        version: u32,
        entries: BTreeMap<DateKey, DiaryEntry>,
    },
    Bare(BTreeMap<DateKey, DiaryEntry>),
}

/// All diary entries, one per date, mirrored to a storage backend.
pub struct DiaryState<B: StorageBackend> {
    backend: B,
    entries: BTreeMap<DateKey, DiaryEntry>,
}

impl<B: StorageBackend> DiaryState<B> {
    /// Reads the persisted map. A missing or unreadable payload yields an
    /// empty diary.
    pub fn load(backend: B) -> Self {
        let entries = match backend.read() {
            Ok(Some(bytes)) => match serde_json::from_slice::<Stored>(&bytes) {
                Ok(Stored::Versioned { version, entries }) => {
                    if version > FORMAT_VERSION {
                        warn!(version, "diary written by a newer format version");
                    }
                    entries
                }
                Ok(Stored::Bare(entries)) => {
                    info!("reading unversioned diary payload");
                    entries
                }
                Err(e) => {
                    warn!(error = %e, "stored diary is unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Ok(None) => {
                info!("no stored diary found, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(error = %e, "failed to read stored diary, starting empty");
                BTreeMap::new()
            }
        };

        info!(entries = entries.len(), "diary loaded");
        DiaryState { backend, entries }
    }

    pub fn get(&self, key: &DateKey) -> Option<&DiaryEntry> {
        self.entries.get(key)
    }

    pub fn has_entry(&self, key: &DateKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries ordered by date.
    pub fn entries(&self) -> impl Iterator<Item = &DiaryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the record at `key` and persists the whole map.
    ///
    /// The in-memory map changes only once the write has succeeded.
    pub fn upsert(&mut self, key: DateKey, mut entry: DiaryEntry) -> Result<(), StoreError> {
        entry.date = key;

        let mut next = self.entries.clone();
        let replaced = next.insert(key, entry).is_some();

        let serialized = serde_json::to_vec(&Envelope {
            version: FORMAT_VERSION,
            entries: &next,
        })?;
        self.backend.write(&serialized)?;

        self.entries = next;
        debug!(date = %key, replaced, "entry persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn entry(date: &str, content: &str) -> DiaryEntry {
        DiaryEntry {
            date: key(date),
            content: content.to_string(),
            mood: "Divine".to_string(),
            stickers: vec![],
            image_url: None,
            editorial: None,
        }
    }

    #[test]
    fn empty_backend_loads_empty() {
        let state = DiaryState::load(MemoryStorage::new());
        assert!(state.is_empty());
    }

    #[test]
    fn corrupt_payload_loads_empty() {
        let state = DiaryState::load(MemoryStorage::with_contents("{not json"));
        assert!(state.is_empty());
    }

    #[test]
    fn one_bad_record_discards_the_whole_payload() {
        let raw = r#"{"2026-03-14":{"date":"2026-03-14"},"someday":{"date":"someday"}}"#;
        let state = DiaryState::load(MemoryStorage::with_contents(raw));
        assert!(state.is_empty());
    }

    #[test]
    fn space_padded_key_is_not_rewritten_to_another_day() {
        let raw = r#"{"2026-03- 4":{"date":"2026-03- 4","content":"padded"}}"#;
        let state = DiaryState::load(MemoryStorage::with_contents(raw));
        assert!(state.is_empty());
        assert!(!state.has_entry(&key("2026-03-04")));
    }

    #[test]
    fn upsert_replaces_wholesale_and_persists_envelope() {
        let storage = MemoryStorage::new();
        let mut state = DiaryState::load(storage.clone());

        let mut first = entry("2026-03-14", "first");
        first.stickers = vec!["✨".to_string()];
        state.upsert(key("2026-03-14"), first).unwrap();
        state
            .upsert(key("2026-03-14"), entry("2026-03-14", "second"))
            .unwrap();

        assert_eq!(state.len(), 1);
        let stored = state.get(&key("2026-03-14")).unwrap();
        assert_eq!(stored.content, "second");
        assert!(stored.stickers.is_empty());

        let json: serde_json::Value =
            serde_json::from_slice(&storage.contents().unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["entries"]["2026-03-14"]["content"], "second");
        assert_eq!(storage.write_count(), 2);
    }

    #[test]
    fn upsert_forces_the_record_date_to_the_key() {
        let mut state = DiaryState::load(MemoryStorage::new());
        state
            .upsert(key("2026-03-15"), entry("2026-03-14", "mislabeled"))
            .unwrap();
        assert_eq!(state.get(&key("2026-03-15")).unwrap().date, key("2026-03-15"));
        assert!(!state.has_entry(&key("2026-03-14")));
    }

    #[test]
    fn failed_write_leaves_committed_state_alone() {
        let storage = MemoryStorage::new();
        let mut state = DiaryState::load(storage.clone());
        state
            .upsert(key("2026-03-14"), entry("2026-03-14", "kept"))
            .unwrap();

        storage.set_fail_writes(true);
        let result = state.upsert(key("2026-03-14"), entry("2026-03-14", "lost"));

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(state.get(&key("2026-03-14")).unwrap().content, "kept");
        assert!(!state.has_entry(&key("2026-03-15")));
    }

    #[test]
    fn reload_reads_back_what_was_written() {
        let storage = MemoryStorage::new();
        let mut state = DiaryState::load(storage.clone());
        state
            .upsert(key("2026-01-02"), entry("2026-01-02", "b"))
            .unwrap();
        state
            .upsert(key("2026-01-01"), entry("2026-01-01", "a"))
            .unwrap();

        let reloaded = DiaryState::load(storage);
        let contents: Vec<_> = reloaded.entries().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b"]);
    }

    #[test]
    fn unversioned_browser_export_loads() {
        let raw = r#"{
            "2026-02-14": {
                "id": "2026-02-14",
                "date": "2026-02-14",
                "content": "Galentine's",
                "mood": "Iconic",
                "stickers": ["💖"],
                "imageUrl": "https://picsum.photos/seed/2026-02-14/600/400",
                "aiEditorial": "{\"headline\":\"Pink Power\",\"editorial\":\"Roses everywhere.\"}"
            }
        }"#;
        let state = DiaryState::load(MemoryStorage::with_contents(raw));
        let stored = state.get(&key("2026-02-14")).unwrap();
        assert_eq!(stored.mood, "Iconic");
        assert_eq!(stored.editorial.as_ref().unwrap().headline, "Pink Power");
    }
}
