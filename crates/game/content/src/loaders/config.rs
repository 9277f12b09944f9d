//! Game configuration loader.

use std::path::Path;

use circuit_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`GameConfig`] defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if !config.retrigger_delay.is_finite() || config.retrigger_delay < 0.0 {
            anyhow::bail!("retrigger_delay must be a non-negative number");
        }
        if !config.draw_interval.is_finite() || config.draw_interval < 0.0 {
            anyhow::bail!("draw_interval must be a non-negative number");
        }
        Ok(config)
    }

    /// The configuration shipped with the crate.
    pub fn builtin() -> LoadResult<GameConfig> {
        Self::parse(include_str!("../../data/config.toml"))
    }
}
