use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a restart does once a round has ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartMode {
    /// Back to the title screen; the next primary action starts a round.
    ToStart,
    /// Straight into a fresh round.
    Immediate,
}

/// How pipes enter the course at the start of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    /// `initial_pipes` pipes are placed ahead of the right edge up front.
    Preseed,
    /// The course starts empty and pipes appear as they are needed.
    Lazy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Classic,
    Arcade,
}

/// Every tunable of the simulation, in world units (logical canvas pixels per frame).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub ground_height: f64,

    pub gravity: f64,
    pub jump_velocity: f64,
    pub max_fall_speed: f64,

    pub bird_x: f64,
    pub bird_y: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    /// Shrinks the bird's collision box on every side.
    pub hitbox_inset: f64,
    pub rotation_scale: f64,
    pub rotation_min: f64,
    pub rotation_max: f64,

    pub pipe_speed: f64,
    pub pipe_width: f64,
    pub pipe_gap: f64,
    pub pipe_spacing: f64,
    pub gap_min_y: f64,
    pub gap_max_y: f64,
    /// Distance past the right edge at which pipes are spawned mid-round.
    pub spawn_offset: f64,
    pub initial_pipes: usize,

    /// Allowed overshoot above the top of the canvas before the round ends.
    pub top_margin: f64,
    /// Height above the bottom of the canvas that counts as the floor.
    pub floor_margin: f64,

    pub restart: RestartMode,
    pub spawn: SpawnMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    pub fn classic() -> Self {
        Self {
            canvas_width: 320.0,
            canvas_height: 480.0,
            ground_height: 50.0,
            gravity: 0.5,
            jump_velocity: -8.0,
            max_fall_speed: 5.0,
            bird_x: 80.0,
            bird_y: 240.0,
            bird_width: 30.0,
            bird_height: 30.0,
            hitbox_inset: 5.0,
            rotation_scale: 3.0,
            rotation_min: -20.0,
            rotation_max: 90.0,
            pipe_speed: 2.0,
            pipe_width: 60.0,
            pipe_gap: 120.0,
            pipe_spacing: 150.0,
            gap_min_y: 150.0,
            gap_max_y: 280.0,
            spawn_offset: 50.0,
            initial_pipes: 3,
            top_margin: 10.0,
            floor_margin: 40.0,
            restart: RestartMode::ToStart,
            spawn: SpawnMode::Preseed,
        }
    }

    /// Same physics as classic with a wider gap range, a tighter hitbox,
    /// the ground line as the floor and a restart that skips the title.
    pub fn arcade() -> Self {
        Self {
            hitbox_inset: 3.0,
            rotation_min: -25.0,
            rotation_max: 70.0,
            gap_min_y: 130.0,
            gap_max_y: 300.0,
            floor_margin: 50.0,
            top_margin: 0.0,
            restart: RestartMode::Immediate,
            spawn: SpawnMode::Lazy,
            ..Self::classic()
        }
    }

    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Arcade => Self::arcade(),
        }
    }

    /// Reads a JSON object of overrides on top of the `variant` preset. Keys absent
    /// from the file keep the preset's value.
    pub fn load(path: &Path, variant: Variant) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut value = serde_json::to_value(Self::preset(variant))?;
        let overrides: serde_json::Value = serde_json::from_str(&text)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(Error::Config(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        };
        if let serde_json::Value::Object(base) = &mut value {
            base.extend(overrides);
        }
        let config: GameConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("bird_width", self.bird_width),
            ("bird_height", self.bird_height),
            ("pipe_speed", self.pipe_speed),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("pipe_spacing", self.pipe_spacing),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(Error::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if self.jump_velocity >= 0.0 {
            return Err(Error::Config(format!(
                "jump_velocity must be negative, got {}",
                self.jump_velocity
            )));
        }
        if self.gap_min_y >= self.gap_max_y {
            return Err(Error::Config(format!(
                "gap range [{}, {}) is empty",
                self.gap_min_y, self.gap_max_y
            )));
        }
        if self.rotation_min > self.rotation_max {
            return Err(Error::Config(format!(
                "rotation clamp [{}, {}] is inverted",
                self.rotation_min, self.rotation_max
            )));
        }
        if self.hitbox_inset * 2.0 >= self.bird_width.min(self.bird_height) {
            return Err(Error::Config(format!(
                "hitbox_inset {} leaves no hitbox",
                self.hitbox_inset
            )));
        }
        Ok(())
    }

    /// Y coordinate whose crossing by the bird's bottom edge ends the round.
    pub fn floor_y(&self) -> f64 {
        self.canvas_height - self.floor_margin
    }

    /// Top of the drawn ground strip.
    pub fn ground_y(&self) -> f64 {
        self.canvas_height - self.ground_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn presets_are_valid() {
        GameConfig::classic().validate().unwrap();
        GameConfig::arcade().validate().unwrap();
    }

    #[test]
    fn variants_disagree_on_restart_and_spawn() {
        let a = GameConfig::classic();
        let b = GameConfig::arcade();
        assert_eq!(a.restart, RestartMode::ToStart);
        assert_eq!(a.spawn, SpawnMode::Preseed);
        assert_eq!(b.restart, RestartMode::Immediate);
        assert_eq!(b.spawn, SpawnMode::Lazy);
        assert_eq!(a.gravity, b.gravity);
    }

    #[test]
    fn load_merges_overrides_onto_preset() {
        let file = write_json(r#"{ "pipe_gap": 140, "restart": "immediate" }"#);
        let config = GameConfig::load(file.path(), Variant::Classic).unwrap();
        assert_eq!(config.pipe_gap, 140.0);
        assert_eq!(config.restart, RestartMode::Immediate);
        assert_eq!(config.pipe_spacing, 150.0);
        assert_eq!(config.spawn, SpawnMode::Preseed);
    }

    #[test]
    fn load_keeps_arcade_values_when_not_overridden() {
        let file = write_json(r#"{ "gravity": 0.4 }"#);
        let config = GameConfig::load(file.path(), Variant::Arcade).unwrap();
        assert_eq!(config.gravity, 0.4);
        assert_eq!(config.floor_margin, 50.0);
        assert_eq!(config.spawn, SpawnMode::Lazy);
    }

    #[test]
    fn load_rejects_bad_values() {
        let file = write_json(r#"{ "gap_min_y": 300, "gap_max_y": 200 }"#);
        assert!(matches!(
            GameConfig::load(file.path(), Variant::Classic),
            Err(Error::Config(_))
        ));

        let file = write_json(r#"{ "jump_velocity": 3 }"#);
        assert!(GameConfig::load(file.path(), Variant::Classic).is_err());

        let file = write_json("[1, 2]");
        assert!(matches!(
            GameConfig::load(file.path(), Variant::Classic),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn floor_is_above_ground_strip_in_classic() {
        let c = GameConfig::classic();
        assert_eq!(c.floor_y(), 440.0);
        assert_eq!(c.ground_y(), 430.0);
    }
}
