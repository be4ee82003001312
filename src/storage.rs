//! Keys and helpers for what the app persists through `eframe::Storage`.

use serde::{de::DeserializeOwned, Serialize};

use crate::gradient::Gradient;
use crate::mood::MoodJournal;
use crate::view::{clamp_zoom, ViewTransform};

pub const ZOOM_LEVEL_KEY: &str = "zoom_level";
pub const CUSTOM_GRADIENTS_KEY: &str = "custom_gradients";
pub const MOOD_HISTORY_KEY: &str = "mood_history";

/// Read a JSON value, logging (and swallowing) anything unreadable
pub fn load<T: DeserializeOwned>(storage: &dyn eframe::Storage, key: &str) -> Option<T> {
    let raw = storage.get_string(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring stored value for {key:?}: {err}");
            None
        }
    }
}

/// Read the app state eframe stored under `key`. Unlike
/// `eframe::get_value`, a value that exists but fails to decode is
/// reported as a warning.
pub fn load_app_state<T: DeserializeOwned>(storage: &dyn eframe::Storage, key: &str) -> Option<T> {
    let value = eframe::get_value(storage, key);
    if value.is_none() {
        if storage.get_string(key).is_some() {
            log::warn!("Saved state under {key:?} is unreadable, starting with defaults");
        } else {
            log::info!("No saved state, starting with a fresh canvas");
        }
    }
    value
}

pub fn save<T: Serialize>(storage: &mut dyn eframe::Storage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => storage.set_string(key, raw),
        Err(err) => log::warn!("Failed to store {key:?}: {err}"),
    }
}

pub fn load_zoom(storage: &dyn eframe::Storage) -> Option<f32> {
    load::<f32>(storage, ZOOM_LEVEL_KEY).filter(|z| z.is_finite()).map(clamp_zoom)
}

pub fn load_custom_gradients(storage: &dyn eframe::Storage) -> Vec<Gradient> {
    load(storage, CUSTOM_GRADIENTS_KEY).unwrap_or_default()
}

pub fn load_mood_history(storage: &dyn eframe::Storage) -> MoodJournal {
    let mut journal: MoodJournal = load(storage, MOOD_HISTORY_KEY).unwrap_or_default();
    journal.repair();
    journal
}

pub fn save_side_data(
    storage: &mut dyn eframe::Storage,
    view: &ViewTransform,
    custom_gradients: &[Gradient],
    moods: &MoodJournal,
) {
    save(storage, ZOOM_LEVEL_KEY, &view.zoom());
    save(storage, CUSTOM_GRADIENTS_KEY, &custom_gradients);
    save(storage, MOOD_HISTORY_KEY, moods);
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::Storage as _;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage(HashMap<String, String>);

    impl eframe::Storage for MemoryStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.0.insert(key.to_owned(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn corrupt_values_fall_back() {
        let mut storage = MemoryStorage::default();
        storage.set_string(MOOD_HISTORY_KEY, "{not json".to_owned());
        storage.set_string(ZOOM_LEVEL_KEY, "42.0".to_owned());
        assert!(load_mood_history(&storage).is_empty());
        assert_eq!(load_zoom(&storage), Some(crate::view::MAX_ZOOM));
        assert!(load_custom_gradients(&storage).is_empty());
    }

    #[test]
    fn out_of_range_moods_are_clamped() {
        let mut storage = MemoryStorage::default();
        storage.set_string(
            MOOD_HISTORY_KEY,
            r#"{"entries": [{"timestamp": 1, "mood": "Calm", "value": 200}, {"timestamp": 2, "mood": "Sad", "value": 0}]}"#
                .to_owned(),
        );
        let journal = load_mood_history(&storage);
        let values: Vec<u8> = journal.entries().iter().map(|e| e.value()).collect();
        assert_eq!(values, vec![10, 1]);
    }

    #[test]
    fn unreadable_app_state_falls_back() {
        let mut storage = MemoryStorage::default();
        assert_eq!(load_app_state::<Vec<u32>>(&storage, eframe::APP_KEY), None);

        storage.set_string(eframe::APP_KEY, "(((".to_owned());
        assert_eq!(load_app_state::<Vec<u32>>(&storage, eframe::APP_KEY), None);

        eframe::set_value(&mut storage, eframe::APP_KEY, &vec![1u32, 2]);
        assert_eq!(load_app_state::<Vec<u32>>(&storage, eframe::APP_KEY), Some(vec![1, 2]));
    }

    #[test]
    fn side_data_survives_a_save() {
        let mut storage = MemoryStorage::default();
        let mut view = ViewTransform::default();
        view.set_zoom(egui::Pos2::ZERO, 2.0);
        let gradients = vec![Gradient::default()];
        let mut moods = MoodJournal::new();
        moods.record(crate::mood::MoodEntry::new(10, crate::mood::Mood::Calm, 7));

        save_side_data(&mut storage, &view, &gradients, &moods);
        assert_eq!(load_zoom(&storage), Some(2.0));
        assert_eq!(load_custom_gradients(&storage), gradients);
        assert_eq!(load_mood_history(&storage), moods);
    }
}
