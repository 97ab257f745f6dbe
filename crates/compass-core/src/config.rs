//! Configuration loading and typed config structures for Fallen Compass.
//!
//! The configuration lives in `fallen-compass.yaml` next to the binary.
//! Every field has a default, so an empty or partial file is valid and the
//! defaults reproduce the shipped game settings.

use std::path::{Path, PathBuf};

use compass_types::{AreaId, AreaSub, SubId, WorldBounds};
use serde::Deserialize;

/// Environment variable overriding [`PersistenceConfig::directory`].
pub const SAVE_DIR_ENV: &str = "COMPASS_SAVE_DIR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompassConfig {
    /// Grid anchors, default reveal, terrain source, and world bounds.
    #[serde(default)]
    pub world_map: WorldMapConfig,

    /// Save slot and autosave settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CompassConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `COMPASS_SAVE_DIR` overrides `persistence.directory` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.persistence.apply_env_overrides();
        Ok(config)
    }
}

/// World-map configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldMapConfig {
    /// Departure cell of every route (the office).
    #[serde(default = "default_office")]
    pub office: AreaSub,

    /// The single area the planning map currently lets the player select,
    /// with the start cell that selection grants.
    #[serde(default = "default_available_start")]
    pub available_start: AreaSub,

    /// Destination of the preview route.
    #[serde(default = "default_preview_target")]
    pub preview_target: AreaSub,

    /// Areas revealed on a new game. Ids outside `0..256` are skipped.
    #[serde(default)]
    pub default_revealed_areas: Vec<i32>,

    /// Terrain image used to build the land mask. All land when absent.
    #[serde(default)]
    pub land_mask_path: Option<PathBuf>,

    /// World-space rectangle mapped onto the grid.
    #[serde(default)]
    pub bounds: WorldBounds,
}

impl Default for WorldMapConfig {
    fn default() -> Self {
        Self {
            office: default_office(),
            available_start: default_available_start(),
            preview_target: default_preview_target(),
            default_revealed_areas: Vec::new(),
            land_mask_path: None,
            bounds: WorldBounds::default(),
        }
    }
}

/// Exploration persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Name of the save slot holding the exploration masks.
    #[serde(default = "default_slot")]
    pub slot: String,

    /// Directory holding file-backed save slots.
    #[serde(default = "default_save_directory")]
    pub directory: PathBuf,

    /// Quiet period after the last reveal before the masks are written.
    #[serde(default = "default_autosave_debounce_ms")]
    pub autosave_debounce_ms: u64,

    /// Restore the saved masks on startup instead of starting fresh.
    #[serde(default)]
    pub restore_on_startup: bool,
}

impl PersistenceConfig {
    /// Override the save directory from `COMPASS_SAVE_DIR` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SAVE_DIR_ENV) {
            self.directory = PathBuf::from(val);
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            slot: default_slot(),
            directory: default_save_directory(),
            autosave_debounce_ms: default_autosave_debounce_ms(),
            restore_on_startup: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_office() -> AreaSub {
    AreaSub::new(AreaId::new(8), SubId::new(0))
}

const fn default_available_start() -> AreaSub {
    AreaSub::new(AreaId::new(24), SubId::new(26))
}

const fn default_preview_target() -> AreaSub {
    AreaSub::new(AreaId::new(25), SubId::new(10))
}

fn default_slot() -> String {
    "FC_WorldMapExploration".to_owned()
}

fn default_save_directory() -> PathBuf {
    PathBuf::from("saves")
}

const fn default_autosave_debounce_ms() -> u64 {
    750
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_shipped_settings() {
        let config = CompassConfig::default();
        assert_eq!(config.world_map.office, AreaSub::new(AreaId::new(8), SubId::new(0)));
        assert_eq!(config.world_map.available_start.area, AreaId::new(24));
        assert_eq!(config.world_map.preview_target.sub, SubId::new(10));
        assert!(config.world_map.default_revealed_areas.is_empty());
        assert_eq!(config.persistence.slot, "FC_WorldMapExploration");
        assert_eq!(config.persistence.autosave_debounce_ms, 750);
        assert!(!config.persistence.restore_on_startup);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world_map:
  office: { area: 0, sub: 0 }
  available_start: { area: 1, sub: 2 }
  preview_target: { area: 17, sub: 255 }
  default_revealed_areas: [0, 1, 300]
  land_mask_path: "assets/land.pgm"
  bounds:
    min_x: -1000.0
    min_y: -2000.0
    max_x: 1000.0
    max_y: 2000.0

persistence:
  slot: "TestSlot"
  directory: "/tmp/compass"
  autosave_debounce_ms: 100
  restore_on_startup: true

logging:
  level: "debug"
"#;

        let config = CompassConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world_map.available_start, AreaSub::new(AreaId::new(1), SubId::new(2)));
        assert_eq!(config.world_map.preview_target.sub, SubId::new(255));
        assert_eq!(config.world_map.default_revealed_areas, vec![0, 1, 300]);
        assert_eq!(config.world_map.land_mask_path, Some(PathBuf::from("assets/land.pgm")));
        assert!((config.world_map.bounds.max_y - 2000.0).abs() < f64::EPSILON);
        assert_eq!(config.persistence.slot, "TestSlot");
        assert_eq!(config.persistence.autosave_debounce_ms, 100);
        assert!(config.persistence.restore_on_startup);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "persistence:\n  autosave_debounce_ms: 10\n";
        let config = CompassConfig::parse(yaml).ok().unwrap_or_default();

        assert_eq!(config.persistence.autosave_debounce_ms, 10);
        // Everything else uses defaults
        assert_eq!(config.persistence.slot, "FC_WorldMapExploration");
        assert_eq!(config.world_map.office.area, AreaId::new(8));
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(CompassConfig::parse("").is_ok());
    }

    #[test]
    fn out_of_range_sub_is_rejected() {
        let yaml = "world_map:\n  preview_target: { area: 1, sub: 256 }\n";
        assert!(matches!(CompassConfig::parse(yaml), Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("fallen-compass.yaml");
        if path.exists() {
            let config = CompassConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
