use crate::cli::{InsertArgs, ModelArgs};
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use nucpos::engine::config::{ConfigFile, NucposConfig, NucposConfigBuilder};
use nucpos::engine::inserted::Flanks;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default data directory, e.g. `~/.local/share/nucpos` on Linux.
pub fn default_data_root() -> Result<PathBuf> {
    ProjectDirs::from("org", "nucpos", "nucpos")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| CliError::Config("Could not determine a home directory.".to_string()))
}

fn model_overrides(args: &ModelArgs) -> NucposConfigBuilder {
    let mut builder = NucposConfigBuilder::new();
    if let Some(root) = &args.data_root {
        builder = builder.data_root(root.clone());
    }
    if let Some(kt) = args.kt {
        builder = builder.kt(kt);
    }
    builder
}

/// Resolves the final configuration with precedence CLI > file > defaults.
pub fn resolve(
    config_path: Option<&Path>,
    overrides: NucposConfigBuilder,
) -> Result<NucposConfig> {
    let file = match config_path {
        Some(path) => ConfigFile::from_path(path)
            .map_err(|e| CliError::Config(e.to_string()))?
            .into_builder(),
        None => NucposConfigBuilder::new(),
    };
    let mut defaults = NucposConfigBuilder::new();
    if let Ok(root) = default_data_root() {
        defaults = defaults.data_root(root);
    }

    let config = overrides
        .or(file)
        .or(defaults)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

pub fn resolve_for_landscape(config_path: Option<&Path>, args: &ModelArgs) -> Result<NucposConfig> {
    resolve(config_path, model_overrides(args))
}

/// Like [`resolve_for_landscape`], additionally applying the insertion flags.
///
/// A single `--left` or `--right` keeps the other side from the file or default.
pub fn resolve_for_insert(config_path: Option<&Path>, args: &InsertArgs) -> Result<NucposConfig> {
    let mut overrides = model_overrides(&args.model);
    if let Some(root) = &args.sequences_root {
        overrides = overrides.sequences_root(root.clone());
    }
    if let Some(genome) = &args.genome {
        overrides = overrides.genome_path(genome.clone());
    }

    let mut config = resolve(config_path, overrides)?;
    config.flanks = Flanks {
        left: args.left.unwrap_or(config.flanks.left),
        right: args.right.unwrap_or(config.flanks.right),
    };
    Ok(config)
}
