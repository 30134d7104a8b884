//! Configuration for the jacobi CLI

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Report format for the `solve` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
}

/// CLI configuration, loaded from a TOML file.
///
/// Every field is optional in the file; command-line flags take precedence.
///
/// ```toml
/// threads = 8
/// format = "json"
/// show_solution = true
/// precision = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Worker threads; `None` means available parallelism
    pub threads: Option<usize>,
    /// Report format
    pub format: OutputFormat,
    /// Print the full solution vector
    pub show_solution: bool,
    /// Include per-iteration history in JSON reports
    pub show_history: bool,
    /// Decimal places in the text report
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: None,
            format: OutputFormat::Text,
            show_solution: false,
            show_history: false,
            precision: 6,
        }
    }
}

impl Config {
    /// Load config from an explicit path, or fall back to defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            bail!("threads must be > 0");
        }
        if self.precision > 17 {
            bail!("precision must be <= 17, got {}", self.precision);
        }
        Ok(())
    }

    /// Resolve the worker count: explicit flag, then config, then the
    /// machine's available parallelism.
    pub fn resolve_threads(&self, flag: Option<usize>) -> usize {
        flag.or(self.threads).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
