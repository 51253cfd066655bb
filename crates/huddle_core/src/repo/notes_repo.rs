//! Optional note persistence under `NOTES_KEY`.
//!
//! Notes are stored as a JSON object keyed by the member id in string form.

use crate::model::member::MemberId;
use crate::store::{KeyValueStore, StoreResult, NOTES_KEY};
use std::collections::BTreeMap;

pub type NotesMap = BTreeMap<MemberId, String>;

/// Loads persisted notes; an absent key yields an empty map.
pub fn load_notes(store: &dyn KeyValueStore) -> StoreResult<NotesMap> {
    match store.get(NOTES_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(NotesMap::new()),
    }
}

pub fn save_notes(store: &mut dyn KeyValueStore, notes: &NotesMap) -> StoreResult<()> {
    let encoded = serde_json::to_string(notes)?;
    store.set(NOTES_KEY, &encoded)
}

pub fn erase_notes(store: &mut dyn KeyValueStore) -> StoreResult<()> {
    store.remove(NOTES_KEY)
}

#[cfg(test)]
mod tests {
    use super::{load_notes, save_notes, NotesMap};
    use crate::store::{KeyValueStore, MemoryStore, NOTES_KEY};

    #[test]
    fn notes_are_keyed_by_stringified_id() {
        let mut store = MemoryStore::new();
        let mut notes = NotesMap::new();
        notes.insert(1_700_000_000_001, "blocked on review".to_string());
        save_notes(&mut store, &notes).unwrap();

        assert_eq!(
            store.get(NOTES_KEY).unwrap().as_deref(),
            Some(r#"{"1700000000001":"blocked on review"}"#)
        );
        assert_eq!(load_notes(&store).unwrap(), notes);
    }
}
