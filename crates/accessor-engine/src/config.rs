//! Accessor configuration (`[accessor]` table)
//!
//! ```toml
//! [accessor]
//! scan_prefix = "uk.ac.tick1."
//! catch_panics = true
//! listener = "console"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::console::ConsoleListener;
use crate::listener::{ActionListener, NoopListener};

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    Validation(String),
}

/// Which listener [`AccessorConfig::build_listener`] produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerKind {
    /// Render every action to standard output
    #[default]
    Console,
    /// Ignore every action
    Silent,
}

/// Settings for an [`Accessor`](crate::Accessor)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessorConfig {
    /// Only enumerate type names starting with this prefix
    pub scan_prefix: Option<String>,

    /// Surface panics in native bodies as target failures of kind `Panic`
    pub catch_panics: bool,

    /// Listener built by [`AccessorConfig::build_listener`]
    pub listener: ListenerKind,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            scan_prefix: None,
            catch_panics: true,
            listener: ListenerKind::default(),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    accessor: AccessorConfig,
}

impl AccessorConfig {
    /// Parse the `[accessor]` table of a TOML document.
    ///
    /// A document without the table yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.accessor.validate()?;
        Ok(file.accessor)
    }

    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_prefix.as_deref() == Some("") {
            return Err(ConfigError::Validation(
                "scan_prefix cannot be empty; omit it to scan every type".to_string(),
            ));
        }
        Ok(())
    }

    /// Construct the configured listener
    pub fn build_listener(&self) -> Box<dyn ActionListener> {
        match self.listener {
            ListenerKind::Console => Box::new(ConsoleListener::new()),
            ListenerKind::Silent => Box::new(NoopListener),
        }
    }
}
