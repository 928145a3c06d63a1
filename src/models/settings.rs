//! Immutable game settings loaded from TOML.
//!
//! Settings are read once at boot and handed to each game at construction.
//! Nothing mutates them afterwards; switching games clones what it needs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Frame-driver and output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Fixed update rate of the logic thread.
    pub frame_rate: u32,
    /// 0.0 to 1.0
    pub master_volume: f32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            master_volume: 0.5,
        }
    }
}

/// Falling-note game tuning. Positions are in track units, 0 at spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmSettings {
    pub lane_count: usize,
    /// Track units travelled per frame.
    pub note_speed: f64,
    /// Position of the judgement line.
    pub hit_line: f64,
    /// Strict tolerance around the judgement line.
    pub hit_window: f64,
    /// Notes past this position expire as misses.
    pub track_length: f64,
    /// Frames between spawns at session start.
    pub spawn_interval: u32,
    pub min_spawn_interval: u32,
    /// The spawn interval shrinks once per this many frames.
    pub ramp_every_frames: u64,
    pub ramp_step: u32,
    pub particles_per_hit: usize,
    /// Particle lifetime in frames.
    pub particle_life: u32,
    /// Misses allowed before the run ends. 0 means the run only ends on Stop.
    pub max_misses: u32,
}

impl Default for RhythmSettings {
    fn default() -> Self {
        Self {
            lane_count: 4,
            note_speed: 4.0,
            hit_line: 500.0,
            hit_window: 50.0,
            track_length: 600.0,
            spawn_interval: 60,
            min_spawn_interval: 20,
            ramp_every_frames: 600,
            ramp_step: 5,
            particles_per_hit: 8,
            particle_life: 30,
            max_misses: 0,
        }
    }
}

/// Sequence-repeat game pacing, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoSettings {
    /// How long a pad stays lit.
    pub pad_delay_ms: f64,
    /// Silence between two shown steps.
    pub gap_delay_ms: f64,
    pub start_delay_ms: f64,
    /// Pause after a cleared round before the next one is shown.
    pub round_clear_delay_ms: f64,
}

impl Default for EchoSettings {
    fn default() -> Self {
        Self {
            pad_delay_ms: 400.0,
            gap_delay_ms: 250.0,
            start_delay_ms: 1000.0,
            round_clear_delay_ms: 1000.0,
        }
    }
}

/// Per-lane presentation shared by both games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneSettings {
    pub labels: Vec<String>,
    pub tones_hz: Vec<f32>,
}

impl Default for LaneSettings {
    fn default() -> Self {
        Self {
            labels: ["Dha", "Na", "Ge", "Tin"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            // C4, E4, G4, C5
            tones_hz: vec![261.63, 329.63, 392.00, 523.25],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub general: GeneralSettings,
    pub rhythm: RhythmSettings,
    pub echo: EchoSettings,
    pub lanes: LaneSettings,
    /// Lane count (as a string) -> key names, one per lane.
    pub keybinds: HashMap<String, Vec<String>>,
}

impl Default for GameSettings {
    fn default() -> Self {
        let mut keybinds = HashMap::new();
        keybinds.insert(
            "4".to_string(),
            ["KeyD", "KeyF", "KeyJ", "KeyK"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        Self {
            general: GeneralSettings::default(),
            rhythm: RhythmSettings::default(),
            echo: EchoSettings::default(),
            lanes: LaneSettings::default(),
            keybinds,
        }
    }
}

impl GameSettings {
    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing, unreadable or invalid.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("SETTINGS: {:?} not found, using defaults", path);
            return Self::default();
        }

        let settings = match load_toml::<GameSettings>(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("SETTINGS: Failed to load {:?}: {}", path, e);
                return Self::default();
            }
        };

        match settings.validate() {
            Ok(()) => {
                log::info!("SETTINGS: Loaded {:?}", path);
                settings
            }
            Err(e) => {
                log::error!("SETTINGS: Rejected {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let r = &self.rhythm;
        if self.general.frame_rate == 0 {
            return Err("general.frame_rate must be positive".to_string());
        }
        if r.lane_count == 0 {
            return Err("rhythm.lane_count must be positive".to_string());
        }
        if r.note_speed <= 0.0 || r.hit_window <= 0.0 || r.track_length <= 0.0 {
            return Err("rhythm speeds, windows and lengths must be positive".to_string());
        }
        if r.hit_line > r.track_length {
            return Err(format!(
                "rhythm.hit_line ({}) lies past rhythm.track_length ({})",
                r.hit_line, r.track_length
            ));
        }
        if r.min_spawn_interval == 0 || r.spawn_interval < r.min_spawn_interval {
            return Err(
                "rhythm.spawn_interval must be >= rhythm.min_spawn_interval > 0".to_string(),
            );
        }
        if r.ramp_every_frames == 0 {
            return Err("rhythm.ramp_every_frames must be positive".to_string());
        }
        if self.lanes.labels.len() < r.lane_count || self.lanes.tones_hz.len() < r.lane_count {
            return Err(format!(
                "lanes tables must cover {} lanes (labels: {}, tones: {})",
                r.lane_count,
                self.lanes.labels.len(),
                self.lanes.tones_hz.len()
            ));
        }
        Ok(())
    }

    /// Label shown for a lane, or its index when none is configured.
    pub fn lane_label(&self, lane: usize) -> String {
        self.lanes
            .labels
            .get(lane)
            .cloned()
            .unwrap_or_else(|| lane.to_string())
    }
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    match toml::from_str(&content) {
        Ok(data) => Ok(data),
        Err(e) => {
            log::error!("Failed to parse TOML file {:?}: {}", path, e);
            Err(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GameSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: GameSettings = toml::from_str(
            r#"
            [rhythm]
            hit_window = 30.0
            max_misses = 3

            [echo]
            pad_delay_ms = 200.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.rhythm.hit_window, 30.0);
        assert_eq!(settings.rhythm.max_misses, 3);
        assert_eq!(settings.rhythm.lane_count, 4);
        assert_eq!(settings.echo.pad_delay_ms, 200.0);
        assert_eq!(settings.echo.gap_delay_ms, 250.0);
        assert_eq!(settings.lanes.labels[1], "Na");
    }

    #[test]
    fn test_validate_rejects_short_lane_tables() {
        let mut settings = GameSettings::default();
        settings.rhythm.lane_count = 5;
        assert!(settings.validate().is_err());

        settings.lanes.labels.push("Ta".to_string());
        settings.lanes.tones_hz.push(587.33);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_hit_line_past_track() {
        let mut settings = GameSettings::default();
        settings.rhythm.hit_line = 700.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = GameSettings::load(Path::new("definitely/not/here.toml"));
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn test_lane_label_falls_back_to_index() {
        let settings = GameSettings::default();
        assert_eq!(settings.lane_label(0), "Dha");
        assert_eq!(settings.lane_label(9), "9");
    }
}
