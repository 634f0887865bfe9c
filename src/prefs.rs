//! Language, theme and profile preferences
//!
//! Values live in the key-value store as plain strings (`"en"`, `"dark"`) or
//! small JSON documents (the profile). Anything unreadable quietly falls back
//! to the defaults.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, LANGUAGE_KEY, PROFILE_KEY, THEME_KEY};
use crate::verse::normalize_text;
use crate::{Error, Result};

/// Maximum number of characters kept from a profile name
pub const MAX_PROFILE_NAME_CHARS: usize = 40;

/// Name shown on the badge when the profile has a photo but no name
pub const DEFAULT_PROFILE_NAME: &str = "Seeker";

/// Display language for meanings and reflections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            other => Err(Error::ConfigError(format!("unknown language '{}'", other))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual theme of the share card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(Error::ConfigError(format!("unknown theme '{}'", other))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted language and theme choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
}

impl Preferences {
    /// Read both preferences, defaulting anything missing or unrecognized
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            language: read_or_default(store, LANGUAGE_KEY),
            theme: read_or_default(store, THEME_KEY),
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(LANGUAGE_KEY, self.language.as_str())?;
        store.set(THEME_KEY, self.theme.as_str())
    }
}

fn read_or_default<T: FromStr + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match store.get(key) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
            debug!("Ignoring unrecognized value '{}' for {}", raw, key);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            debug!("Could not read {}: {}", key, e);
            T::default()
        }
    }
}

/// User badge drawn on share cards
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileBadge {
    #[serde(default)]
    pub name: String,
    /// Data URL (`data:image/png;base64,...`) or bare base64 image bytes
    #[serde(rename = "photoDataUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_data: Option<String>,
}

impl ProfileBadge {
    /// Build a badge with a normalized name capped at 40 characters
    pub fn new(name: &str, photo_data: Option<String>) -> Self {
        let name: String = normalize_text(name)
            .chars()
            .take(MAX_PROFILE_NAME_CHARS)
            .collect();
        let photo_data = photo_data
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Self { name, photo_data }
    }

    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.photo_data.is_none()
    }

    /// Name for display, falling back to the default when only a photo is set
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_PROFILE_NAME
        } else {
            &self.name
        }
    }

    /// Read the stored profile; malformed or missing data yields an empty badge
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(PROFILE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                debug!("Could not read profile: {}", e);
                return Self::default();
            }
        };
        match serde_json::from_str::<ProfileBadge>(&raw) {
            Ok(stored) => Self::new(&stored.name, stored.photo_data),
            Err(e) => {
                debug!("Ignoring malformed profile: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| Error::StorageError(format!("Failed to serialize profile: {}", e)))?;
        store.set(PROFILE_KEY, &json)
    }

    pub fn clear(store: &dyn KeyValueStore) -> Result<()> {
        store.remove(PROFILE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn defaults_when_nothing_stored() {
        let store = MemoryStore::new();
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[test]
    fn unknown_stored_values_fall_back() {
        let store = MemoryStore::new();
        store.set(LANGUAGE_KEY, "fr").unwrap();
        store.set(THEME_KEY, "light").unwrap();
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.theme, Theme::Light);
    }

    #[test]
    fn preferences_save_plain_strings() {
        let store = MemoryStore::new();
        Preferences { language: Language::Hi, theme: Theme::Light }
            .save(&store)
            .unwrap();
        assert_eq!(store.get(LANGUAGE_KEY).unwrap().as_deref(), Some("hi"));
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn profile_name_is_normalized_and_capped() {
        let long = "  A   very long name that keeps going well past the forty char cap ";
        let badge = ProfileBadge::new(long, Some("   ".into()));
        assert_eq!(badge.name.chars().count(), MAX_PROFILE_NAME_CHARS);
        assert!(badge.name.starts_with("A very long"));
        assert!(badge.photo_data.is_none());
    }

    #[test]
    fn profile_roundtrips_through_store() {
        let store = MemoryStore::new();
        let badge = ProfileBadge::new("Arjuna", Some("data:image/png;base64,AAAA".into()));
        badge.save(&store).unwrap();
        let raw = store.get(PROFILE_KEY).unwrap().unwrap();
        assert!(raw.contains("photoDataUrl"));
        assert_eq!(ProfileBadge::load(&store), badge);

        ProfileBadge::clear(&store).unwrap();
        assert!(ProfileBadge::load(&store).is_empty());
    }

    #[test]
    fn photo_only_profile_uses_default_name() {
        let badge = ProfileBadge::new("", Some("AAAA".into()));
        assert!(!badge.is_empty());
        assert_eq!(badge.display_name(), DEFAULT_PROFILE_NAME);
    }

    #[test]
    fn malformed_profile_is_ignored() {
        let store = MemoryStore::new();
        store.set(PROFILE_KEY, "not json").unwrap();
        assert!(ProfileBadge::load(&store).is_empty());
    }
}
