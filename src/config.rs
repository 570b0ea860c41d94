use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::BinStageError;

pub const CONFIG_FILE_NAME: &str = "kira-binstage.json";

pub const DEFAULT_CPUS: usize = 24;
pub const DEFAULT_MIN_COMPLETENESS: f64 = 94.0;
pub const DEFAULT_MAX_CONTAMINATION: f64 = 5.0;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub cpus: Option<usize>,
    #[serde(default)]
    pub min_completeness: Option<f64>,
    #[serde(default)]
    pub max_contamination: Option<f64>,
    #[serde(default)]
    pub gtdbtk: Option<String>,
}

/// Quality gate. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub min_completeness: f64,
    pub max_contamination: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_completeness: DEFAULT_MIN_COMPLETENESS,
            max_contamination: DEFAULT_MAX_CONTAMINATION,
        }
    }
}

impl Thresholds {
    pub fn is_high_quality(&self, completeness: f64, contamination: f64) -> bool {
        completeness > self.min_completeness && contamination < self.max_contamination
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageConfig {
    pub thresholds: Thresholds,
    pub cpus: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            cpus: DEFAULT_CPUS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cpus: Option<usize>,
    pub min_completeness: Option<f64>,
    pub max_contamination: Option<f64>,
    pub gtdbtk: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub stage: StageConfig,
    pub gtdbtk: Option<PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// An explicit path must be readable; the implicit locations are optional.
    pub fn resolve(
        path: Option<&str>,
        overrides: &ConfigOverrides,
    ) -> Result<ResolvedConfig, BinStageError> {
        let config = match path {
            Some(path) => Self::load(PathBuf::from(path))?,
            None => match Self::discover() {
                Some(found) => Self::load(found)?,
                None => Config::default(),
            },
        };
        Self::resolve_config(config, overrides)
    }

    pub fn resolve_config(
        config: Config,
        overrides: &ConfigOverrides,
    ) -> Result<ResolvedConfig, BinStageError> {
        let cpus = overrides.cpus.or(config.cpus).unwrap_or(DEFAULT_CPUS);
        if cpus == 0 {
            return Err(BinStageError::InvalidConfig(
                "cpus must be at least 1".to_string(),
            ));
        }

        let thresholds = Thresholds {
            min_completeness: overrides
                .min_completeness
                .or(config.min_completeness)
                .unwrap_or(DEFAULT_MIN_COMPLETENESS),
            max_contamination: overrides
                .max_contamination
                .or(config.max_contamination)
                .unwrap_or(DEFAULT_MAX_CONTAMINATION),
        };
        if !thresholds.min_completeness.is_finite() || !thresholds.max_contamination.is_finite()
        {
            return Err(BinStageError::InvalidConfig(
                "thresholds must be finite numbers".to_string(),
            ));
        }

        let gtdbtk = overrides
            .gtdbtk
            .clone()
            .or_else(|| config.gtdbtk.map(PathBuf::from));

        Ok(ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            stage: StageConfig { thresholds, cpus },
            gtdbtk,
        })
    }

    fn load(config_path: PathBuf) -> Result<Config, BinStageError> {
        let content = fs::read_to_string(&config_path)
            .map_err(|_| BinStageError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| BinStageError::ConfigParse(err.to_string()))
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        ProjectDirs::from("", "", "kira-binstage")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }
}
