use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "fleet-tables.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

/// Values written into blank tunable fields of ship/weapon rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub damage_multiplier: String,
    pub max_per_turn: String,
    pub cooldown_turns: String,
    pub max_usage: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            damage_multiplier: "1".into(),
            max_per_turn: "1".into(),
            cooldown_turns: "1".into(),
            max_usage: "99999".into(),
        }
    }
}

/// Table locations, relative to the working directory unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Paths {
    pub ships: PathBuf,
    pub weapons: PathBuf,
    pub ship_weapons: PathBuf,
    pub defenses: PathBuf,
    pub ship_defenses: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            ships: "ships_2.csv".into(),
            weapons: "weapons_2.csv".into(),
            ship_weapons: "ships_weapons_2.csv".into(),
            defenses: "defenses_2.csv".into(),
            ship_defenses: "ships_defenses_2.csv".into(),
        }
    }
}

/// One CSV whose `image_src` column is mirrored into `image_dir`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSet {
    pub csv: PathBuf,
    pub image_dir: PathBuf,
    /// Prefix written back into `image_src`, e.g. `images/ships`
    pub public_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Directory local `image_src` values are resolved against
    pub public_root: PathBuf,
    pub timeout_secs: u64,
    pub sets: Vec<ImageSet>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            public_root: "src/public".into(),
            timeout_secs: 15,
            sets: vec![
                ImageSet {
                    csv: "csv_files/ships.csv".into(),
                    image_dir: "src/public/images/ships".into(),
                    public_path: "images/ships".into(),
                },
                ImageSet {
                    csv: "csv_files/boss_ships.csv".into(),
                    image_dir: "src/public/images/bosses".into(),
                    public_path: "images/bosses".into(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: Paths,
    pub defaults: Defaults,
    pub images: ImageConfig,
}

impl Config {
    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Load from `explicit` if given, else the first config file found, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        Self::discover_from(explicit, &Self::search_paths())
    }

    fn discover_from(
        explicit: Option<&Path>,
        candidates: &[PathBuf],
    ) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::load(path).with_context(|| format!("Invalid config {:?}", path))?;
            return Ok((config, Some(path.to_path_buf())));
        }

        for candidate in candidates {
            if candidate.is_file() {
                debug!("using config {:?}", candidate);
                let config = Self::load(candidate)
                    .with_context(|| format!("Invalid config {:?}", candidate))?;
                return Ok((config, Some(candidate.clone())));
            }
        }

        Ok((Self::default(), None))
    }

    /// Locations checked by [`Config::discover`], in order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(proj_dirs) = ProjectDirs::from("", "", "fleet-tables") {
            paths.push(proj_dirs.config_dir().join("config.toml"));
        }
        paths
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
