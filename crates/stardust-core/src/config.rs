//! Engine presets loaded from TOML, with validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Background star field settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPreset {
    pub star_count: usize,
}

impl Default for FieldPreset {
    fn default() -> Self {
        Self { star_count: 150 }
    }
}

/// Cursor trail settings. Sizes and offsets are in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailPreset {
    /// Particle time-to-live in ticks.
    pub max_life: u32,
    /// Particles created per pointer-move event.
    pub spawn_per_move: usize,
    /// Decay/prune period.
    pub tick_period_ms: u64,
    /// Half-width of the spawn jitter around the pointer.
    pub jitter: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Length of the render-side drift and fade after spawn.
    pub drift_seconds: f32,
    pub glow_diameter: f32,
}

impl Default for TrailPreset {
    fn default() -> Self {
        Self {
            max_life: 20,
            spawn_per_move: 3,
            tick_period_ms: 50,
            jitter: 5.0,
            size_min: 1.0,
            size_max: 4.0,
            drift_seconds: 1.0,
            glow_diameter: 40.0,
        }
    }
}

impl TrailPreset {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Counts for the faint background grid lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinePreset {
    pub horizontal: usize,
    pub vertical: usize,
    pub diagonal: usize,
}

impl Default for LinePreset {
    fn default() -> Self {
        Self {
            horizontal: 10,
            vertical: 10,
            diagonal: 5,
        }
    }
}

/// RGBA colours, straight (non-premultiplied) alpha in `0..=1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub star: Vec4,
    pub dust: Vec4,
    pub glow: Vec4,
    pub line: Vec4,
    pub background: Vec4,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            star: Vec4::new(1.0, 1.0, 1.0, 1.0),
            // #c77dff / 40
            dust: Vec4::new(0.78, 0.49, 1.0, 0.4),
            // #9d4edd / 20
            glow: Vec4::new(0.616, 0.306, 0.867, 0.2),
            // #9d4edd / 20 under a 20% layer
            line: Vec4::new(0.616, 0.306, 0.867, 0.04),
            // #050a14
            background: Vec4::new(0.02, 0.04, 0.08, 1.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub field: FieldPreset,
    pub trail: TrailPreset,
    pub lines: LinePreset,
    pub palette: Palette,
    /// Pins every random source when set.
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let trail = &self.trail;
        if trail.max_life == 0 {
            return Err(ConfigError::Invalid("trail.max_life must be positive".into()));
        }
        if trail.tick_period_ms == 0 {
            return Err(ConfigError::Invalid(
                "trail.tick_period_ms must be positive".into(),
            ));
        }
        let floats = [
            ("trail.jitter", trail.jitter),
            ("trail.size_min", trail.size_min),
            ("trail.size_max", trail.size_max),
            ("trail.drift_seconds", trail.drift_seconds),
            ("trail.glow_diameter", trail.glow_diameter),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
        }
        if trail.jitter < 0.0 {
            return Err(ConfigError::Invalid("trail.jitter must be >= 0".into()));
        }
        if !(trail.size_min > 0.0 && trail.size_min < trail.size_max) {
            return Err(ConfigError::Invalid(format!(
                "trail size range [{}, {}) must be positive and non-empty",
                trail.size_min, trail.size_max
            )));
        }
        if trail.drift_seconds <= 0.0 {
            return Err(ConfigError::Invalid(
                "trail.drift_seconds must be positive".into(),
            ));
        }
        if trail.glow_diameter < 0.0 {
            return Err(ConfigError::Invalid("trail.glow_diameter must be >= 0".into()));
        }
        let palette = &self.palette;
        let colors = [
            ("palette.star", palette.star),
            ("palette.dust", palette.dust),
            ("palette.glow", palette.glow),
            ("palette.line", palette.line),
            ("palette.background", palette.background),
        ];
        if let Some((name, _)) = colors.iter().find(|(_, color)| !color.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.field.star_count, 150);
        assert_eq!(config.trail.max_life, 20);
        assert_eq!(config.trail.spawn_per_move, 3);
        assert_eq!(config.trail.tick_period(), Duration::from_millis(50));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            seed = 42

            [trail]
            max_life = 8

            [palette]
            glow = [1.0, 0.0, 0.0, 0.5]
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.trail.max_life, 8);
        assert_eq!(config.trail.spawn_per_move, 3);
        assert_eq!(config.palette.glow, Vec4::new(1.0, 0.0, 0.0, 0.5));
        assert_eq!(config.palette.star, Palette::default().star);
    }

    #[test]
    fn rejects_zero_life_and_period() {
        let err = EngineConfig::from_toml_str("[trail]\nmax_life = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = EngineConfig::from_toml_str("[trail]\ntick_period_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_size_range() {
        let err =
            EngineConfig::from_toml_str("[trail]\nsize_min = 4.0\nsize_max = 1.0").unwrap_err();
        assert!(err.to_string().contains("size range"));
    }

    #[test]
    fn rejects_infinite_floats() {
        for (key, text) in [
            ("trail.jitter", "[trail]\njitter = inf"),
            ("trail.size_max", "[trail]\nsize_max = inf"),
            ("trail.drift_seconds", "[trail]\ndrift_seconds = inf"),
            ("trail.glow_diameter", "[trail]\nglow_diameter = nan"),
        ] {
            let err = EngineConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{key}: {err}");
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }

    #[test]
    fn rejects_non_finite_palette() {
        let err =
            EngineConfig::from_toml_str("[palette]\ndust = [1.0, inf, 1.0, 0.4]").unwrap_err();
        assert!(err.to_string().contains("palette.dust"));
    }

    #[test]
    fn reports_parse_errors() {
        let err = EngineConfig::from_toml_str("[trail\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::load("/definitely/not/here/stardust.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert!(path.ends_with("stardust.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
