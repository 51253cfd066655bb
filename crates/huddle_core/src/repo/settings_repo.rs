//! Settings persistence: one JSON boolean per key.

use crate::model::settings::Settings;
use crate::store::{
    KeyValueStore, StoreError, StoreResult, COMPACT_MODE_KEY, TEAM_SECTION_EXPANDED_KEY,
};
use log::warn;

/// Loads settings, falling back to defaults for absent or invalid flags.
pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    let defaults = Settings::default();
    Settings {
        compact_mode: load_flag(store, COMPACT_MODE_KEY, defaults.compact_mode),
        team_section_expanded: load_flag(
            store,
            TEAM_SECTION_EXPANDED_KEY,
            defaults.team_section_expanded,
        ),
    }
}

/// Writes one flag.
pub fn save_flag(store: &mut dyn KeyValueStore, key: &str, value: bool) -> StoreResult<()> {
    let encoded = serde_json::to_string(&value)?;
    store.set(key, &encoded)
}

fn load_flag(store: &dyn KeyValueStore, key: &str, default: bool) -> bool {
    let decoded = store.get(key).and_then(|raw| match raw {
        Some(raw) => serde_json::from_str::<bool>(&raw)
            .map(Some)
            .map_err(StoreError::from),
        None => Ok(None),
    });
    match decoded {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            warn!(
                "event=settings_load module=settings status=fallback key={} error={}",
                key, err
            );
            default
        }
    }
}
