use std::fs;
use std::path::{Path, PathBuf};

use engine::{Rgba, Vec2, DEFAULT_BACKGROUND};
use serde::Deserialize;
use thiserror::Error;

pub(crate) const CONFIG_ENV_VAR: &str = "SAILA_CONFIG";
/// Minimum distance kept between the gap and the top/bottom of the field.
pub(crate) const GAP_MARGIN: f32 = 50.0;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}' at {location}: {source}")]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Point {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl From<Point> for Vec2 {
    fn from(point: Point) -> Self {
        Vec2::new(point.x, point.y)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) field_width: f32,
    pub(crate) field_height: f32,
    pub(crate) gap_height: f32,
    pub(crate) pipe_width: f32,
    pub(crate) spawn_interval: f32,
    pub(crate) pipe_speed: f32,
    pub(crate) scoring_x: f32,
    pub(crate) gravity: f32,
    pub(crate) jump_velocity: f32,
    pub(crate) player_spawn: Point,
    pub(crate) player_size: f32,
    pub(crate) player_color: Rgba,
    pub(crate) pipe_color: Rgba,
    pub(crate) text_color: Rgba,
    pub(crate) background_color: Rgba,
    pub(crate) player_image: Option<PathBuf>,
    pub(crate) pipe_image: Option<PathBuf>,
    pub(crate) target_fps: u32,
    pub(crate) show_gap_debug: bool,
    pub(crate) seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            gap_height: 150.0,
            pipe_width: 52.0,
            spawn_interval: 2.0,
            pipe_speed: 150.0,
            scoring_x: 100.0,
            gravity: 800.0,
            jump_velocity: -300.0,
            player_spawn: Point { x: 100.0, y: 100.0 },
            player_size: 40.0,
            player_color: [255, 0, 0, 255],
            pipe_color: [0, 200, 0, 255],
            text_color: [255, 255, 255, 255],
            background_color: DEFAULT_BACKGROUND,
            player_image: None,
            pipe_image: None,
            target_fps: 60,
            show_gap_debug: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reads `path` when given, otherwise returns the defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&raw, path)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, Self>(&mut deserializer).map_err(|error| {
            let location = error.path().to_string();
            ConfigError::Parse {
                path: path.to_path_buf(),
                location,
                source: error.into_inner(),
            }
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("gap_height", self.gap_height),
            ("pipe_width", self.pipe_width),
            ("spawn_interval", self.spawn_interval),
            ("player_size", self.player_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("expected a positive number, got {value}")));
            }
        }
        if self.pipe_speed.is_nan() || self.pipe_speed < 0.0 {
            return Err(invalid(
                "pipe_speed",
                format!("expected a non-negative number, got {}", self.pipe_speed),
            ));
        }
        if self.gap_height + 2.0 * GAP_MARGIN > self.field_height {
            return Err(invalid(
                "gap_height",
                format!(
                    "gap {} plus two {GAP_MARGIN} margins does not fit a field of height {}",
                    self.gap_height, self.field_height
                ),
            ));
        }
        if self.player_size > self.field_height {
            return Err(invalid(
                "player_size",
                format!("taller than the field ({})", self.field_height),
            ));
        }
        if self.target_fps == 0 {
            return Err(invalid("target_fps", "expected at least 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::Invalid { field, message }
}
