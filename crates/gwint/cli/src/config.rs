//! CLI configuration file support.
//!
//! Defaults live at `<config dir>/gwint/config.toml`; every field is
//! optional and command-line flags always win.

use crate::error::CliResult;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Namespace assumed when `-n` is not given.
    pub default_namespace: Option<String>,

    /// Snapshot file used when `-f` is not given.
    pub default_snapshot: Option<PathBuf>,
}

impl CliConfig {
    /// Load from an explicit path, or from the platform config directory.
    /// A missing file is not an error; flags and built-in defaults cover
    /// everything.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let path = match path {
            Some(explicit) => PathBuf::from(explicit),
            None => match dirs::config_dir() {
                Some(dir) => dir.join("gwint").join("config.toml"),
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&contents)?;
        debug!(path = %path.display(), "Loaded CLI config");
        Ok(config)
    }
}
