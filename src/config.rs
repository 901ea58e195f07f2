//! User configuration loaded from `config.toml`.
//!
//! ```toml
//! [display]
//! formula_view = false
//! decimals = 2
//! ```

use anyhow::{Context, Result};
use directories::ProjectDirs;
use examgrid_engine::engine::DEFAULT_DECIMALS;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub formula_view: bool,
    pub decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            formula_view: false,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

pub(crate) fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("me", "shoryuken", "examgrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

impl Config {
    pub fn parse(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    /// Load an explicit config file, or the default one if it exists.
    /// A missing default file yields the defaults; a malformed file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.is_file() => p,
                _ => return Ok(Config::default()),
            },
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Config::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_path_is_deterministic() {
        // Should never panic and should either be Some(path) or None.
        let _ = default_config_path();
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let cfg = Config::parse("[display]\nformula_view = true\n").unwrap();
        assert!(cfg.display.formula_view);
        assert_eq!(cfg.display.decimals, DEFAULT_DECIMALS);
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        assert!(Config::parse("[display]\ncolour = 1\n").is_err());
    }
}
