//! User preferences
//!
//! Only the language survives between visits. It is stored as a bare tag
//! under the same key the rest of the site uses.

use serde::{Deserialize, Serialize};

use crate::i18n::Locale;
use crate::persistence::KeyValueStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub locale: Locale,
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "i18nextLng";

    /// Load from `store`; unknown or unreadable values fall back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(tag)) => match Locale::from_tag(&tag) {
                Some(locale) => Self { locale },
                None => {
                    log::info!("Unsupported language {:?}, using default", tag);
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Settings unavailable: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        if let Err(e) = store.set(Self::STORAGE_KEY, self.locale.as_tag()) {
            log::warn!("Failed to save settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store).locale, Locale::En);

        Settings { locale: Locale::Es }.save(&mut store);
        assert_eq!(store.raw(Settings::STORAGE_KEY), Some("es"));
        assert_eq!(Settings::load(&store).locale, Locale::Es);
    }

    #[test]
    fn test_region_tags_are_accepted() {
        let store = MemoryStore::with(Settings::STORAGE_KEY, "es-AR");
        assert_eq!(Settings::load(&store).locale, Locale::Es);
        let store = MemoryStore::with(Settings::STORAGE_KEY, "de");
        assert_eq!(Settings::load(&store).locale, Locale::En);
    }
}
