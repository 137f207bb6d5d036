//! Persisted display preferences.
//!
//! Only the theme and the accent color survive a reload. They are stored as
//! plain strings under two keys in whatever key-value store the host
//! provides (browser `localStorage`, a file, or [`MemoryStore`] in tests).
//! Unknown or missing values load as defaults so a stale store never breaks
//! startup.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "prefs_test.rs"]
mod prefs_test;

pub const THEME_KEY: &str = "theme";
pub const ACCENT_KEY: &str = "accentColor";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Dark,
    /// Pure black background.
    #[default]
    TrueDark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::TrueDark => "true-dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "dark" => Some(Self::Dark),
            "true-dark" => Some(Self::TrueDark),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::TrueDark,
            Self::TrueDark => Self::Dark,
        }
    }
}

/// Brand accent. Persisted by display name; the page reads the RGB triplet
/// into a CSS variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Accent {
    #[default]
    Blue,
    Purple,
    Emerald,
    Rose,
    Amber,
}

impl Accent {
    pub const ALL: [Self; 5] = [Self::Blue, Self::Purple, Self::Emerald, Self::Rose, Self::Amber];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "TEKGUYZ Blue",
            Self::Purple => "Vivid Purple",
            Self::Emerald => "Emerald",
            Self::Rose => "Rose",
            Self::Amber => "Amber",
        }
    }

    /// Space-separated RGB channels, e.g. `"37 99 235"`.
    #[must_use]
    pub fn rgb(self) -> &'static str {
        match self {
            Self::Blue => "37 99 235",
            Self::Purple => "124 58 237",
            Self::Emerald => "5 150 105",
            Self::Rose => "225 29 72",
            Self::Amber => "217 119 6",
        }
    }

    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Blue => "#2563EB",
            Self::Purple => "#7C3AED",
            Self::Emerald => "#059669",
            Self::Rose => "#E11D48",
            Self::Amber => "#D97706",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == raw.trim())
    }
}

impl Serialize for Accent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Accent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String key-value storage the host platform provides. Writes are
/// best-effort.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub accent: Accent,
}

impl Preferences {
    #[must_use]
    pub fn load(store: &impl KeyValueStore) -> Self {
        Self {
            theme: store.get(THEME_KEY).as_deref().and_then(Theme::parse).unwrap_or_default(),
            accent: store.get(ACCENT_KEY).as_deref().and_then(Accent::parse).unwrap_or_default(),
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(THEME_KEY, self.theme.as_str());
        store.set(ACCENT_KEY, self.accent.as_str());
    }

    /// Flip the theme and persist both keys.
    pub fn toggle_theme(&mut self, store: &mut impl KeyValueStore) -> Theme {
        self.theme = self.theme.toggled();
        self.save(store);
        self.theme
    }

    pub fn set_accent(&mut self, accent: Accent, store: &mut impl KeyValueStore) {
        self.accent = accent;
        self.save(store);
    }
}
