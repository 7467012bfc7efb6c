//! Game settings and preferences
//!
//! Persisted separately from game saves.

use serde::{Deserialize, Serialize};

use crate::consts::REFERENCE_HZ;
use crate::platform::KeyValueStore;
use crate::tuning::{GapPolicy, Pacing, SpawnPolicy, Tuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Always 1-2 gaps, from the first ring
    pub hard_mode: bool,
    /// Rings arrive on a beat instead of by distance
    pub rhythm_mode: bool,
    /// Scale wall motion by real frame time instead of per frame
    pub realtime_pacing: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background rhythm volume (0.0 - 1.0)
    pub music_volume: f32,
    pub music_enabled: bool,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no difficulty banner flash, no hit blink)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hard_mode: false,
            rhythm_mode: false,
            realtime_pacing: false,

            show_fps: false,

            master_volume: 0.5,
            sfx_volume: 1.0,
            music_volume: 0.7,
            music_enabled: true,
            muted: false,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "hexa_rush_settings";

    /// Balance table for the selected modes
    pub fn tuning(&self) -> Tuning {
        Tuning {
            gap_policy: if self.hard_mode {
                GapPolicy::FixedHard
            } else {
                GapPolicy::TimeGated
            },
            spawn_policy: if self.rhythm_mode {
                SpawnPolicy::Beat
            } else {
                SpawnPolicy::Proximity
            },
            pacing: if self.realtime_pacing {
                Pacing::RealTime {
                    reference_hz: REFERENCE_HZ,
                }
            } else {
                Pacing::PerFrame
            },
            ..Tuning::default()
        }
    }

    /// Effective sound effect volume (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music volume (0 when muted or disabled)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Whether transient flashes/blinks should be drawn
    pub fn effects_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings (defaults on any failure)
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings storage unavailable: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings (failures are logged and ignored)
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {e}"),
            },
            Err(e) => log::warn!("Failed to encode settings: {e}"),
        }
    }
}
