//! Last-used element colors, cached in local storage.
//!
//! DESIGN
//! ======
//! One JSON record holds the theme color picked per element type, a short
//! most-recent-first list of custom colors, the last color picked overall and
//! the time of the last write. Records older than [`EXPIRY_MS`] are ignored on
//! read and replaced by defaults.
//!
//! A color key starting with `#` is a literal custom color; anything else is
//! a symbolic theme key such as `"blue"`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::{self, KvStore};
use crate::util::color::{canonical_custom_color, is_custom_color};
use crate::util::now_ms;

#[cfg(test)]
#[path = "colors_test.rs"]
mod tests;

pub const STORAGE_KEY: &str = "boardshare_last_used_colors";
pub const MAX_RECENT_CUSTOM_COLORS: usize = 8;
/// 30 days.
pub const EXPIRY_MS: i64 = 30 * 24 * 60 * 60 * 1000;
pub const FALLBACK_THEME_COLOR: &str = "black";

const DEFAULT_ELEMENT_COLORS: &[(&str, &str)] = &[
    ("sticky_note", "yellow"),
    ("rectangle", "blue"),
    ("ellipse", "green"),
    ("frame", "gray"),
    ("line", "black"),
    ("arrow", "black"),
    ("text", "black"),
    ("freehand", "black"),
];

/// Built-in theme color for an element type.
#[must_use]
pub fn default_color_for(element_type: &str) -> &'static str {
    DEFAULT_ELEMENT_COLORS
        .iter()
        .find(|(kind, _)| *kind == element_type)
        .map_or(FALLBACK_THEME_COLOR, |(_, color)| *color)
}

// =============================================================================
// RECORD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUsedColors {
    /// Theme color key chosen per element type.
    #[serde(default)]
    pub element_colors: BTreeMap<String, String>,
    /// Custom colors, most recent first, no duplicates.
    #[serde(default)]
    pub recent_custom_colors: Vec<String>,
    #[serde(default)]
    pub last_selected_color: Option<String>,
    /// Epoch milliseconds of the last write.
    pub timestamp: i64,
}

impl Default for LastUsedColors {
    fn default() -> Self {
        Self::defaults_at(now_ms())
    }
}

impl LastUsedColors {
    #[must_use]
    pub fn defaults_at(timestamp: i64) -> Self {
        Self {
            element_colors: DEFAULT_ELEMENT_COLORS
                .iter()
                .map(|(kind, color)| ((*kind).to_owned(), (*color).to_owned()))
                .collect(),
            recent_custom_colors: Vec::new(),
            last_selected_color: None,
            timestamp,
        }
    }

    /// Stale when older than [`EXPIRY_MS`] or stamped in the future (clock
    /// moved backwards since the write).
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.timestamp > now || now.saturating_sub(self.timestamp) > EXPIRY_MS
    }

    /// Theme color for `element_type`, falling back to the built-in default.
    #[must_use]
    pub fn color_for(&self, element_type: &str) -> &str {
        match self.element_colors.get(element_type) {
            Some(color) => color,
            None => default_color_for(element_type),
        }
    }

    /// Apply one color pick.
    pub fn record(&mut self, element_type: &str, color_key: &str, now: i64) {
        let selected = if is_custom_color(color_key) {
            let color = canonical_custom_color(color_key);
            self.recent_custom_colors.retain(|c| *c != color);
            self.recent_custom_colors.insert(0, color.clone());
            self.recent_custom_colors.truncate(MAX_RECENT_CUSTOM_COLORS);
            color
        } else {
            self.element_colors
                .insert(element_type.to_owned(), color_key.to_owned());
            color_key.to_owned()
        };
        self.last_selected_color = Some(selected);
        self.timestamp = now;
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// Color preference cache over an injected store.
pub struct ColorPreferences<S> {
    store: S,
}

impl<S: KvStore> ColorPreferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a color pick for `element_type` and persist the record.
    pub fn save_last_used_color(&self, element_type: &str, color_key: &str) {
        let color_key = color_key.trim();
        if color_key.is_empty() {
            debug!(element_type, "ignoring empty color key");
            return;
        }
        let now = now_ms();
        let mut colors = self.load_at(now);
        colors.record(element_type, color_key, now);
        storage::save_json(&self.store, STORAGE_KEY, &colors);
    }

    /// The stored record, or defaults when nothing fresh is stored.
    pub fn get_last_used_colors(&self) -> LastUsedColors {
        self.load_at(now_ms())
    }

    pub fn get_last_used_color_for_element_type(&self, element_type: &str) -> String {
        self.get_last_used_colors().color_for(element_type).to_owned()
    }

    pub fn get_recent_custom_colors(&self) -> Vec<String> {
        self.get_last_used_colors().recent_custom_colors
    }

    pub fn get_last_selected_color(&self) -> Option<String> {
        self.get_last_used_colors().last_selected_color
    }

    pub fn clear_saved_colors(&self) {
        storage::remove_key(&self.store, STORAGE_KEY);
    }

    fn load_at(&self, now: i64) -> LastUsedColors {
        match storage::load_json::<LastUsedColors>(&self.store, STORAGE_KEY) {
            Some(colors) if !colors.is_expired_at(now) => colors,
            Some(colors) => {
                debug!(stored_at = colors.timestamp, "stored colors expired; using defaults");
                LastUsedColors::defaults_at(now)
            }
            None => LastUsedColors::defaults_at(now),
        }
    }
}
