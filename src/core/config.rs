/*
 * Tunable parameters of the swipe deck and their persistence. The screen variants
 * the deck replaces differed only in these numbers (commit distance, velocity,
 * rotation range, undo policy), so they are all data here rather than code.
 *
 * `ConfigManagerOperations` abstracts where the settings live; `CoreConfigManager`
 * keeps them as JSON in the per-user config directory resolved by `path_utils`.
 * Every field has a default, so partial files are accepted.
 */
use crate::core::card_stack::UndoPolicy;
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

pub const DECK_CONFIG_FILENAME: &str = "deck_config.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoProjectDirectory,
    Invalid(String),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration format error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine the configuration directory")
            }
            ConfigError::Invalid(reason) => write!(f, "Invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/*
 * How far a drag must travel before a release may commit. The main variant used a
 * third of the screen width; another one required reaching within a fixed inset of
 * the screen edge.
 */
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum CommitDistance {
    FractionOfWidth(f64),
    InsetFromEdge(f64),
}

impl CommitDistance {
    pub fn resolve(self, screen_width: f64) -> f64 {
        match self {
            CommitDistance::FractionOfWidth(fraction) => screen_width * fraction,
            CommitDistance::InsetFromEdge(inset) => screen_width - inset,
        }
    }
}

impl Default for CommitDistance {
    fn default() -> Self {
        CommitDistance::FractionOfWidth(1.0 / 3.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationRange {
    pub offset_extent: f64,
    pub max_degrees: f64,
}

impl Default for RotationRange {
    fn default() -> Self {
        RotationRange {
            offset_extent: 200.0,
            max_degrees: 5.0,
        }
    }
}

/*
 * Physical parameters of the snap-back spring. The defaults correspond to a bouncy
 * spring of speed 20 and bounciness 8, converted to stiffness/damping with unit mass.
 */
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub rest_displacement: f64,
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        SpringConfig {
            stiffness: 512.0,
            damping: 30.0,
            mass: 1.0,
            rest_displacement: 0.001,
            rest_speed: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub screen_width: f64,
    pub activation_threshold: f64,
    pub resistance: f64,
    pub lean_margin: f64,
    pub commit_distance: CommitDistance,
    // Units per millisecond, as reported by the pointer source.
    pub commit_velocity: f64,
    pub exit_duration_ms: u64,
    pub rotation: RotationRange,
    pub spring: SpringConfig,
    pub undo_policy: UndoPolicy,
}

impl Default for DeckConfig {
    fn default() -> Self {
        DeckConfig {
            screen_width: 390.0,
            activation_threshold: 10.0,
            resistance: 0.7,
            lean_margin: 250.0,
            commit_distance: CommitDistance::default(),
            commit_velocity: 0.3,
            exit_duration_ms: 200,
            rotation: RotationRange::default(),
            spring: SpringConfig::default(),
            undo_policy: UndoPolicy::default(),
        }
    }
}

impl DeckConfig {
    pub fn commit_distance_px(&self) -> f64 {
        self.commit_distance.resolve(self.screen_width)
    }

    // Raw drag distance beyond which the lean preview switches on.
    pub fn lean_distance_px(&self) -> f64 {
        self.screen_width - self.lean_margin
    }

    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_duration_ms)
    }

    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }
        fn non_negative(name: &str, value: f64) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )))
            }
        }

        positive("screen_width", self.screen_width)?;
        non_negative("activation_threshold", self.activation_threshold)?;
        if !(self.resistance > 0.0 && self.resistance <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "resistance must be in (0, 1], got {}",
                self.resistance
            )));
        }
        non_negative("lean_margin", self.lean_margin)?;
        positive("commit distance", self.commit_distance_px())?;
        non_negative("commit_velocity", self.commit_velocity)?;
        positive("rotation.offset_extent", self.rotation.offset_extent)?;
        non_negative("rotation.max_degrees", self.rotation.max_degrees)?;
        positive("spring.stiffness", self.spring.stiffness)?;
        positive("spring.damping", self.spring.damping)?;
        positive("spring.mass", self.spring.mass)?;
        positive("spring.rest_displacement", self.spring.rest_displacement)?;
        positive("spring.rest_speed", self.spring.rest_speed)?;
        Ok(())
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    fn load_config(&self, app_name: &str) -> Result<Option<DeckConfig>>;
    fn save_config(&self, app_name: &str, config: &DeckConfig) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    // Reads and writes inside `dir` instead of the per-user config directory.
    pub fn with_config_dir(dir: PathBuf) -> Self {
        CoreConfigManager {
            config_dir_override: Some(dir),
        }
    }

    fn config_file_path(&self, app_name: &str) -> Result<PathBuf> {
        let dir = match &self.config_dir_override {
            Some(dir) => dir.clone(),
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoProjectDirectory)?,
        };
        Ok(dir.join(DECK_CONFIG_FILENAME))
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the deck configuration for `app_name`. A missing file is not an error
     * and yields `Ok(None)`; a file that parses but holds out-of-range values is
     * rejected with `ConfigError::Invalid`.
     */
    fn load_config(&self, app_name: &str) -> Result<Option<DeckConfig>> {
        let file_path = self.config_file_path(app_name)?;
        if !file_path.exists() {
            log::debug!("CoreConfigManager: Config file {file_path:?} does not exist.");
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&file_path)?);
        let config: DeckConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        log::debug!("CoreConfigManager: Loaded config from {file_path:?}.");
        Ok(Some(config))
    }

    fn save_config(&self, app_name: &str, config: &DeckConfig) -> Result<()> {
        config.validate()?;
        let file_path = self.config_file_path(app_name)?;
        let mut writer = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(&mut writer, config)?;
        writer.flush()?;
        log::debug!("CoreConfigManager: Saved config to {file_path:?}.");
        Ok(())
    }
}
