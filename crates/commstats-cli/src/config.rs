//! Layered configuration: defaults, user file, project file, then flags.
//!
//! Files are TOML:
//!
//! ```toml
//! split_sizes = [2, 4, 8]
//! fail_fast = false
//! delimiter = ","
//! ```
//!
//! The user file lives at `<config dir>/commstats/config.toml`. The project
//! file is `--config PATH` if given (it must exist), else `./commstats.toml`
//! when present. Keys missing from a layer keep the value of the layer
//! below it.

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PROJECT_CONFIG_FILE: &str = "commstats.toml";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Block sizes reported for the split fraction, in order.
    pub split_sizes: Vec<i64>,
    /// Stop at the first file that fails to load or validate.
    pub fail_fast: bool,
    /// Field delimiter of the matrix files.
    pub delimiter: char,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            split_sizes: vec![2, 4, 8],
            fail_fast: false,
            delimiter: ',',
        }
    }
}

/// One configuration layer as read from disk; every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub split_sizes: Option<Vec<i64>>,
    #[serde(default)]
    pub fail_fast: Option<bool>,
    #[serde(default)]
    pub delimiter: Option<char>,
}

/// Settings passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub split_sizes: Vec<i64>,
    pub fail_fast: bool,
    pub delimiter: Option<char>,
}

impl StatsConfig {
    /// Apply one file layer on top of `self`.
    #[must_use]
    pub fn merge(mut self, layer: ConfigFile) -> Self {
        if let Some(split_sizes) = layer.split_sizes {
            self.split_sizes = split_sizes;
        }
        if let Some(fail_fast) = layer.fail_fast {
            self.fail_fast = fail_fast;
        }
        if let Some(delimiter) = layer.delimiter {
            self.delimiter = delimiter;
        }
        self
    }

    /// Apply command-line flags on top of `self`.
    #[must_use]
    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if !overrides.split_sizes.is_empty() {
            self.split_sizes.clone_from(&overrides.split_sizes);
        }
        if overrides.fail_fast {
            self.fail_fast = true;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        self
    }

    /// Reject settings no run could use.
    ///
    /// # Errors
    ///
    /// Fails on non-positive block sizes or a non-ASCII delimiter.
    pub fn validate(&self) -> Result<()> {
        if let Some(k) = self.split_sizes.iter().find(|&&k| k <= 0) {
            bail!("split size must be greater than zero, got {k}");
        }
        ensure!(
            self.delimiter.is_ascii(),
            "delimiter must be a single ASCII character, got {:?}",
            self.delimiter
        );
        Ok(())
    }

    /// Delimiter as the byte the CSV reader expects.
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter).unwrap_or(b',')
    }
}

/// Parse one TOML layer.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid config TOML.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ConfigFile>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_optional(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        debug!(path = %path.display(), "loading config layer");
        load_config_file(path)
    } else {
        Ok(ConfigFile::default())
    }
}

/// Path of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("commstats/config.toml"))
}

/// Resolve the effective configuration for this run.
///
/// # Errors
///
/// Fails if an explicit `--config` file is missing, any present layer is
/// malformed, or the merged result is invalid.
pub fn resolve(overrides: &Overrides, cwd: &Path) -> Result<StatsConfig> {
    let mut config = StatsConfig::default();

    if let Some(path) = user_config_path() {
        config = config.merge(load_optional(&path)?);
    }

    let project = match &overrides.config_path {
        Some(path) => load_config_file(path)?,
        None => load_optional(&cwd.join(PROJECT_CONFIG_FILE))?,
    };
    config = config.merge(project).apply(overrides);

    config.validate()?;
    debug!(?config, "effective config");
    Ok(config)
}
