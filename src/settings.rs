//! Wheel settings and preferences
//!
//! Persisted separately from the roster in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Spin animation tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTuning {
    /// Animation length (milliseconds). Fixed for players; never read from or
    /// written to storage, only set in code (tests, tooling).
    #[serde(skip, default = "default_duration_ms")]
    pub duration_ms: f64,
    /// Lower bound of whole extra turns (inclusive)
    pub min_extra_turns: f64,
    /// Upper bound of whole extra turns (exclusive)
    pub max_extra_turns: f64,
}

fn default_duration_ms() -> f64 {
    SPIN_DURATION_MS
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self {
            duration_ms: SPIN_DURATION_MS,
            min_extra_turns: MIN_EXTRA_TURNS,
            max_extra_turns: MAX_EXTRA_TURNS,
        }
    }
}

/// Wheel settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Tick and win cues
    pub audio_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Wheel ===
    /// Canvas edge length the wheel is painted at
    pub wheel_size: u32,
    /// Labels longer than this are truncated
    pub label_max_chars: usize,

    // === Spin ===
    pub spin: SpinTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            master_volume: 0.8,
            wheel_size: WHEEL_CANVAS_SIZE,
            label_max_chars: LABEL_MAX_CHARS,
            spin: SpinTuning::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "spin_wheel_settings";

    /// Clamp every field into a usable range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.wheel_size = self.wheel_size.clamp(200, 4096);
        self.label_max_chars = self.label_max_chars.clamp(1, 64);

        let spin = &mut self.spin;
        if !spin.duration_ms.is_finite() || spin.duration_ms < 0.0 {
            spin.duration_ms = SPIN_DURATION_MS;
        }
        if !spin.min_extra_turns.is_finite() || spin.min_extra_turns < 0.0 {
            spin.min_extra_turns = MIN_EXTRA_TURNS;
        }
        if !spin.max_extra_turns.is_finite() || spin.max_extra_turns < spin.min_extra_turns {
            spin.max_extra_turns = spin.min_extra_turns;
        }
        self
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Toggle audio cues, returning the new state
    pub fn toggle_audio(&mut self) -> bool {
        self.audio_enabled = !self.audio_enabled;
        self.audio_enabled
    }

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
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
