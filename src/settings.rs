//! Game settings and preferences
//!
//! Nothing is persisted between page loads. Settings come from the page URL
//! query string on the web, or from a JSON file for the native demo.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Difficulty, FormationLayout, Progression};

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl FieldConfig {
    /// The original 800x600 landscape field
    pub fn landscape() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }

    /// An invader below this y ends the game
    pub fn bottom_threshold(&self) -> f32 {
        self.height - BOTTOM_MARGIN
    }

    /// Rightmost x an invader may reach before the formation reverses
    pub fn right_edge(&self) -> f32 {
        self.width - EDGE_PADDING - INVADER_WIDTH
    }

    /// Player spawn point
    pub fn player_start(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height - PLAYER_BOTTOM_OFFSET)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Starting difficulty
    pub difficulty: Difficulty,
    pub field: FieldConfig,
    /// Spawn layout for each level
    pub layout: FormationLayout,
    /// Open in the Ready state and wait for Play
    pub start_paused: bool,
    /// Start with sound muted
    pub muted: bool,
    /// Formation pause after each edge drop (0 disables)
    pub drop_settle_ms: f32,
    /// Per-level speed/fire-rate ramp
    pub progression: Progression,
    /// Fixed RNG seed (random when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            field: FieldConfig::default(),
            layout: FormationLayout::Patterned,
            start_paused: true,
            muted: false,
            drop_settle_ms: DROP_SETTLE_MS,
            progression: Progression::default(),
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        // Settings only holds plain data, serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Parse settings from a URL query string (`?difficulty=hard&muted=1`)
    ///
    /// Unknown keys and bad values are logged and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();

        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "difficulty" => match Difficulty::from_str(value) {
                    Some(d) => settings.difficulty = d,
                    None => log::warn!(
                        "Unknown difficulty '{}', keeping {}",
                        value,
                        settings.difficulty.as_str()
                    ),
                },
                "layout" => match FormationLayout::from_str(value) {
                    Some(l) => settings.layout = l,
                    None => log::warn!("Unknown layout '{}'", value),
                },
                "field" => match value {
                    "portrait" => settings.field = FieldConfig::default(),
                    "landscape" => settings.field = FieldConfig::landscape(),
                    _ => log::warn!("Unknown field '{}'", value),
                },
                "muted" => match parse_flag(value) {
                    Some(flag) => settings.muted = flag,
                    None => log::warn!("Bad muted flag '{}'", value),
                },
                "paused" => match parse_flag(value) {
                    Some(flag) => settings.start_paused = flag,
                    None => log::warn!("Bad paused flag '{}'", value),
                },
                "seed" => match value.parse() {
                    Ok(seed) => settings.seed = Some(seed),
                    Err(_) => log::warn!("Bad seed '{}'", value),
                },
                _ => log::warn!("Ignoring unknown setting '{}'", key),
            }
        }

        settings
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let query = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();

        if query.is_empty() {
            log::info!("Using default settings");
            return Self::default();
        }

        let settings = Self::from_query(&query);
        log::info!("Loaded settings from URL: {}", query);
        settings
    }

    /// Native: settings file given as the first argument
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::args().nth(1) else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Self::default()
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "" | "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.difficulty, Difficulty::Normal);
        assert_eq!(settings.field.width, 400.0);
        assert_eq!(settings.field.bottom_threshold(), 500.0);
        assert!(settings.start_paused);
        assert!(!settings.muted);
    }

    #[test]
    fn test_landscape_threshold_matches_fixed_500() {
        assert_eq!(FieldConfig::landscape().bottom_threshold(), 500.0);
        assert_eq!(FieldConfig::landscape().right_edge(), 750.0);
    }

    #[test]
    fn test_from_query() {
        let settings = Settings::from_query(
            "?difficulty=hard&layout=classic&field=landscape&muted&paused=0&seed=42",
        );
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.layout, FormationLayout::Classic);
        assert_eq!(settings.field, FieldConfig::landscape());
        assert!(settings.muted);
        assert!(!settings.start_paused);
        assert_eq!(settings.seed, Some(42));
    }

    #[test]
    fn test_from_query_ignores_garbage() {
        let settings = Settings::from_query("difficulty=nightmare&bogus=1&seed=abc");
        assert_eq!(settings.difficulty, Difficulty::Normal);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_json_partial() {
        let settings =
            Settings::from_json(r#"{ "difficulty": "easy", "drop_settle_ms": 0 }"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.drop_settle_ms, 0.0);
        assert_eq!(settings.layout, FormationLayout::Patterned);
        assert_eq!(settings.progression.speed_cap, Some(150.0));

        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_progression() {
        let mut settings = Settings::default();
        settings.progression.speed_cap = None;
        let back = Settings::from_json(&settings.to_json()).unwrap();
        assert_eq!(back.progression.speed_cap, None);
    }
}
