use super::inserted::Flanks;
use crate::core::energy::DEFAULT_KT;
use crate::core::io::layout::DataLayout;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const SEQUENCES_DIR: &str = "sequences";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Thermal energy kT must be finite and positive, got {0}")]
    InvalidThermalEnergy(f64),

    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}", path = path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Locations and defaults shared by every landscape computation.
#[derive(Debug, Clone, PartialEq)]
pub struct NucposConfig {
    pub data_root: PathBuf,
    pub sequences_root: PathBuf,
    pub genome_path: Option<PathBuf>,
    pub flanks: Flanks,
    pub kt: f64,
}

impl NucposConfig {
    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.data_root, &self.sequences_root)
    }

    /// Loads a kebab-case TOML configuration file and applies defaults.
    ///
    /// Relative paths are kept as written.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        ConfigFile::from_path(path)?.into_builder().build()
    }
}

/// On-disk shape of a configuration file; every entry is optional so a file
/// can be layered under command-line overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub data_root: Option<PathBuf>,
    pub sequences_root: Option<PathBuf>,
    pub genome: Option<PathBuf>,
    pub flanks: Option<Flanks>,
    pub kt: Option<f64>,
}

impl ConfigFile {
    /// Reads the file without applying defaults, for layering under overrides.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn into_builder(self) -> NucposConfigBuilder {
        NucposConfigBuilder {
            data_root: self.data_root,
            sequences_root: self.sequences_root,
            genome_path: self.genome,
            flanks: self.flanks,
            kt: self.kt,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct NucposConfigBuilder {
    data_root: Option<PathBuf>,
    sequences_root: Option<PathBuf>,
    genome_path: Option<PathBuf>,
    flanks: Option<Flanks>,
    kt: Option<f64>,
}

impl NucposConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_root(mut self, path: PathBuf) -> Self {
        self.data_root = Some(path);
        self
    }
    pub fn sequences_root(mut self, path: PathBuf) -> Self {
        self.sequences_root = Some(path);
        self
    }
    pub fn genome_path(mut self, path: PathBuf) -> Self {
        self.genome_path = Some(path);
        self
    }
    pub fn flanks(mut self, flanks: Flanks) -> Self {
        self.flanks = Some(flanks);
        self
    }
    pub fn kt(mut self, kt: f64) -> Self {
        self.kt = Some(kt);
        self
    }

    /// Fills only the entries that are still unset from `other`.
    pub fn or(self, other: NucposConfigBuilder) -> Self {
        Self {
            data_root: self.data_root.or(other.data_root),
            sequences_root: self.sequences_root.or(other.sequences_root),
            genome_path: self.genome_path.or(other.genome_path),
            flanks: self.flanks.or(other.flanks),
            kt: self.kt.or(other.kt),
        }
    }

    pub fn build(self) -> Result<NucposConfig, ConfigError> {
        let data_root = self
            .data_root
            .ok_or(ConfigError::MissingParameter("data_root"))?;
        let sequences_root = self
            .sequences_root
            .unwrap_or_else(|| data_root.join(SEQUENCES_DIR));
        let kt = self.kt.unwrap_or(DEFAULT_KT);
        if !(kt.is_finite() && kt > 0.0) {
            return Err(ConfigError::InvalidThermalEnergy(kt));
        }

        Ok(NucposConfig {
            data_root,
            sequences_root,
            genome_path: self.genome_path,
            flanks: self.flanks.unwrap_or_default(),
            kt,
        })
    }
}
