//! Command implementations.

pub mod build;
pub mod check;

use std::path::Path;

use blogsmith_core::BuildConfig;
use color_eyre::eyre::{Result, WrapErr};

/// Load configuration for the project at `root`.
///
/// Variables from `<root>/.env` are added to the environment first, without
/// replacing ones already set. Relative paths are resolved against `root`.
pub fn load_config(root: &Path) -> Result<BuildConfig> {
    let env_file = root.join(".env");
    match dotenvy::from_path(&env_file) {
        Ok(()) => tracing::debug!(path = %env_file.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => {
            return Err(e).wrap_err_with(|| format!("Failed to read {}", env_file.display()));
        }
    }

    let config = BuildConfig::from_env().wrap_err("Failed to load configuration")?;
    Ok(config.rooted_at(root))
}
