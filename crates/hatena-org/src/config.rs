use crate::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub use hatena_org_core::config::Config;
use hatena_org_core::config::parse_config;

/// `~/.config/hatena-blog-org/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| {
        home.join(".config")
            .join("hatena-blog-org")
            .join("config.json")
    })
}

/// Read a JSON config file.
pub fn read_config_file(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    parse_config(&json).map_err(|e| eyre!("{}: {}", path.display(), e))
}

/// Merge flag/env values with a config file and validate the result.
///
/// Values given on the command line (or through the environment) win. The
/// config file is `file` when given, otherwise the default path if it exists.
pub fn load_config(overrides: Config, file: Option<&Path>) -> Result<Config> {
    let from_file = match file {
        Some(path) => Some(read_config_file(path)?),
        None => match default_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Using config file {}", path.display());
                Some(read_config_file(&path)?)
            }
            _ => None,
        },
    };

    let config = match from_file {
        Some(file_config) => overrides.or(file_config),
        None => overrides,
    };

    config.validate()?;
    Ok(config)
}
