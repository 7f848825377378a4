//! Clock settings
//!
//! Persisted in LocalStorage on the web; natively read from an optional JSON file.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::CountdownError;
use crate::sim::DotColor;

/// Which glyph decides whether retired dots explode at high speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExplosionTrigger {
    /// The digit leaving the slot is a zero
    #[default]
    RetiringZero,
    /// The digit entering the slot is a zero
    SuccessorZero,
}

/// Largest number of day digits the layout supports
pub const MAX_DAY_DIGITS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Moment the countdown reaches zero (Unix ms)
    pub target_timestamp_ms: f64,
    /// Zero-padded width of the days field
    pub day_digits: usize,
    /// Top-left corner of the first glyph on the surface
    pub origin: Vec2,

    // === Timing ===
    pub tick_interval_ms: u32,

    // === Physics ===
    /// Cap on simultaneously simulated dots
    pub particle_budget: usize,
    /// Downward gravity (pixels/s²)
    pub gravity: f32,
    pub high_release_speed: f32,
    pub low_release_speed: f32,
    pub explosion_trigger: ExplosionTrigger,

    // === Look ===
    /// Lit-dot colors, one picked per new digit
    pub palette: Vec<DotColor>,
    /// RNG seed for colors and release velocities
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_timestamp_ms: 0.0,
            day_digits: 3,
            origin: Vec2::new(0.0, 0.0),

            tick_interval_ms: TICK_INTERVAL_MS,

            particle_budget: PARTICLE_BUDGET,
            gravity: GRAVITY,
            high_release_speed: HIGH_RELEASE_SPEED,
            low_release_speed: LOW_RELEASE_SPEED,
            explosion_trigger: ExplosionTrigger::RetiringZero,

            palette: vec![
                DotColor::Red,
                DotColor::Orange,
                DotColor::Yellow,
                DotColor::Green,
                DotColor::Cyan,
                DotColor::Blue,
                DotColor::Magenta,
            ],
            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Reject settings the clock cannot run with
    pub fn validate(&self) -> Result<(), CountdownError> {
        let fail = |msg: String| Err(CountdownError::InvalidSettings(msg));

        if self.day_digits == 0 || self.day_digits > MAX_DAY_DIGITS {
            return fail(format!("day_digits must be 1-{MAX_DAY_DIGITS}, got {}", self.day_digits));
        }
        if self.tick_interval_ms == 0 {
            return fail("tick_interval_ms must be positive".to_string());
        }
        if self.palette.is_empty() {
            return fail("palette must not be empty".to_string());
        }
        if !self.target_timestamp_ms.is_finite() {
            return fail("target_timestamp_ms must be finite".to_string());
        }
        for (name, value) in [
            ("gravity", self.gravity),
            ("high_release_speed", self.high_release_speed),
            ("low_release_speed", self.low_release_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return fail(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, CountdownError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Take the target from a page-supplied value in Unix milliseconds
    /// (for example the `data-target` attribute of the countdown element)
    pub fn set_target_from(&mut self, value: &str) -> Result<(), CountdownError> {
        let target: f64 = value.trim().parse().map_err(|_| {
            CountdownError::InvalidSettings(format!("target must be Unix milliseconds, got {value:?}"))
        })?;
        if !target.is_finite() || target < 0.0 {
            return Err(CountdownError::InvalidSettings(format!(
                "target must be a non-negative timestamp, got {target}"
            )));
        }
        self.target_timestamp_ms = target;
        Ok(())
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dot_countdown_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: read from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.particle_budget, 150);
        assert_eq!(settings.tick_interval_ms, 30);
        assert_eq!(settings.explosion_trigger, ExplosionTrigger::RetiringZero);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(
            r#"{ "target_timestamp_ms": 1700000000000, "palette": ["green"], "explosion_trigger": "SuccessorZero" }"#,
        )
        .unwrap();
        assert_eq!(settings.target_timestamp_ms, 1_700_000_000_000.0);
        assert_eq!(settings.palette, vec![DotColor::Green]);
        assert_eq!(settings.explosion_trigger, ExplosionTrigger::SuccessorZero);
        assert_eq!(settings.day_digits, 3);
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        assert!(matches!(
            Settings::from_json(r#"{ "day_digits": 0 }"#),
            Err(CountdownError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "palette": [] }"#),
            Err(CountdownError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "gravity": -1.0 }"#),
            Err(CountdownError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(CountdownError::SettingsJson(_))
        ));
    }

    #[test]
    fn test_target_from_page_value() {
        let mut settings = Settings::default();
        settings.set_target_from(" 1767225600000 ").unwrap();
        assert_eq!(settings.target_timestamp_ms, 1_767_225_600_000.0);
        assert!(settings.validate().is_ok());

        for bad in ["", "tomorrow", "NaN", "inf", "-5"] {
            assert!(
                matches!(settings.set_target_from(bad), Err(CountdownError::InvalidSettings(_))),
                "{bad:?}"
            );
        }
        assert_eq!(settings.target_timestamp_ms, 1_767_225_600_000.0);
    }

    #[test]
    fn test_roundtrip_through_json() {
        let settings = Settings {
            day_digits: 4,
            seed: 42,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.day_digits, 4);
        assert_eq!(back.seed, 42);
    }
}
