//! Roster persistence over the key-value port.
//!
//! # Responsibility
//! - Encode the full roster as a JSON array under `ROSTER_KEY`.
//! - Decode and validate the persisted roster at startup.
//!
//! # Invariants
//! - Reads reject invalid persisted state instead of masking it.
//! - Clearing removes the key entirely; it never writes an empty list.

use crate::model::member::{validate_roster, Member};
use crate::store::{KeyValueStore, StoreError, StoreResult, ROSTER_KEY};

/// Loads the persisted roster.
///
/// Returns an empty roster when the key is absent.
///
/// # Errors
/// - `StoreError::Codec` when the value is not a JSON member array.
/// - `StoreError::InvalidData` when members have blank names or duplicate ids.
pub fn load_roster(store: &dyn KeyValueStore) -> StoreResult<Vec<Member>> {
    let Some(raw) = store.get(ROSTER_KEY)? else {
        return Ok(Vec::new());
    };
    let members: Vec<Member> = serde_json::from_str(&raw)?;
    validate_roster(&members).map_err(|err| StoreError::InvalidData(err.to_string()))?;
    Ok(members)
}

/// Encodes the roster in its persisted JSON shape.
pub fn encode_roster(members: &[Member]) -> StoreResult<String> {
    Ok(serde_json::to_string(members)?)
}

/// Writes the full roster.
pub fn save_roster(store: &mut dyn KeyValueStore, members: &[Member]) -> StoreResult<()> {
    let encoded = encode_roster(members)?;
    store.set(ROSTER_KEY, &encoded)
}

/// Erases the persisted roster key.
pub fn erase_roster(store: &mut dyn KeyValueStore) -> StoreResult<()> {
    store.remove(ROSTER_KEY)
}

#[cfg(test)]
mod tests {
    use super::{erase_roster, load_roster, save_roster};
    use crate::model::member::Member;
    use crate::store::{KeyValueStore, MemoryStore, StoreError, ROSTER_KEY};

    #[test]
    fn absent_key_loads_empty_roster() {
        let store = MemoryStore::new();
        assert!(load_roster(&store).unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let mut store = MemoryStore::new();
        let members = vec![
            Member::new(30, "Zed").unwrap(),
            Member::new(10, "Amy").unwrap(),
        ];
        save_roster(&mut store, &members).unwrap();
        assert_eq!(load_roster(&store).unwrap(), members);
    }

    #[test]
    fn malformed_json_is_a_codec_error() {
        let mut store = MemoryStore::new();
        store.set(ROSTER_KEY, "{not json").unwrap();
        assert!(matches!(
            load_roster(&store).unwrap_err(),
            StoreError::Codec(_)
        ));
    }

    #[test]
    fn duplicate_ids_are_invalid_data() {
        let mut store = MemoryStore::new();
        store
            .set(ROSTER_KEY, r#"[{"id":1,"name":"A"},{"id":1,"name":"B"}]"#)
            .unwrap();
        assert!(matches!(
            load_roster(&store).unwrap_err(),
            StoreError::InvalidData(_)
        ));
    }

    #[test]
    fn erase_removes_key() {
        let mut store = MemoryStore::new();
        save_roster(&mut store, &[]).unwrap();
        assert!(store.contains_key(ROSTER_KEY));
        erase_roster(&mut store).unwrap();
        assert!(!store.contains_key(ROSTER_KEY));
    }
}
