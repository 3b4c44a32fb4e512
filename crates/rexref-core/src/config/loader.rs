//! Configuration file discovery and loading

use super::rexref_config::RexrefConfig;
use crate::error::RexrefError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// File names searched in each directory, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[".rexref.toml", "rexref.toml", "rexref.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Find the nearest config file, moving up from `start_path` to the root
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| RexrefError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    pub fn load_from_file(path: &Path) -> Result<RexrefConfig> {
        RexrefConfig::load(path).map_err(|e| {
            RexrefError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from an explicit path or by auto-discovery
    ///
    /// An explicit path must exist. When discovery finds nothing the
    /// default configuration is used.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<RexrefConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(RexrefError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(RexrefConfig::default())
            }
        }
    }
}
