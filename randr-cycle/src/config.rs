//! Configuration types for mode cycling.

use crate::errors::CycleError;
use randr_catalog::ModeFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete cycling configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// External tool settings.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Cycling loop settings.
    #[serde(default)]
    pub cycle: CycleConfig,
    /// Minimum mode size accepted into the catalog.
    #[serde(default)]
    pub filter: ModeFilter,
}

/// External tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Program that prints the modes of every monitor.
    #[serde(default = "default_randr_program")]
    pub query_program: String,
    /// Extra arguments for the query program.
    #[serde(default)]
    pub query_args: Vec<String>,
    /// Program invoked as `<program> modify <monitor> -m <mode>`.
    #[serde(default = "default_randr_program")]
    pub modify_program: String,
    /// Program invoked as `<program> -f <file>`.
    #[serde(default = "default_screenshot_program")]
    pub screenshot_program: String,
}

fn default_randr_program() -> String {
    "gnome-randr".to_string()
}

fn default_screenshot_program() -> String {
    "gnome-screenshot".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            query_program: default_randr_program(),
            query_args: Vec::new(),
            modify_program: default_randr_program(),
            screenshot_program: default_screenshot_program(),
        }
    }
}

/// Cycling loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Pause after every mode application, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Upper bound for each external command, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_ms: Option<u64>,
    /// Screenshot file extension.
    #[serde(default = "default_screenshot_extension")]
    pub screenshot_extension: String,
    /// Name of the screenshot directory, before the keyword suffix.
    #[serde(default = "default_base_dir_name")]
    pub base_dir_name: String,
}

fn default_settle_ms() -> u64 {
    8_000 // let the hardware recover
}

fn default_screenshot_extension() -> String {
    "jpg".to_string()
}

fn default_base_dir_name() -> String {
    "xrandr_screens".to_string()
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            command_timeout_ms: None,
            screenshot_extension: default_screenshot_extension(),
            base_dir_name: default_base_dir_name(),
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml_str(text: &str) -> Result<Self, CycleError> {
        toml::from_str(text)
            .map_err(|e| CycleError::Config(format!("Failed to parse config: {e}")))
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, CycleError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CycleError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), CycleError> {
        for (name, program) in [
            ("query_program", &self.tools.query_program),
            ("modify_program", &self.tools.modify_program),
            ("screenshot_program", &self.tools.screenshot_program),
        ] {
            if program.trim().is_empty() {
                return Err(CycleError::Config(format!("{name} cannot be empty")));
            }
        }

        if self.cycle.base_dir_name.is_empty() {
            return Err(CycleError::Config(
                "Screenshot directory name cannot be empty".to_string(),
            ));
        }

        if self.cycle.screenshot_extension.is_empty() {
            return Err(CycleError::Config(
                "Screenshot extension cannot be empty".to_string(),
            ));
        }

        if self.filter.min_width == 0 {
            return Err(CycleError::Config(
                "Minimum width cannot be 0".to_string(),
            ));
        }

        if self.cycle.command_timeout_ms == Some(0) {
            return Err(CycleError::Config(
                "Command timeout cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the settle interval.
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.cycle.settle_ms)
    }

    /// Returns the per-command timeout, if any.
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.cycle.command_timeout_ms.map(Duration::from_millis)
    }
}

/// Builder for creating a `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the settle interval after each mode change.
    #[must_use]
    pub fn settle(mut self, settle: Duration) -> Self {
        self.config.cycle.settle_ms = u64::try_from(settle.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Bounds every external command.
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.cycle.command_timeout_ms =
            Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the query program.
    #[must_use]
    pub fn query_program(mut self, program: impl Into<String>) -> Self {
        self.config.tools.query_program = program.into();
        self
    }

    /// Sets the mode-set program.
    #[must_use]
    pub fn modify_program(mut self, program: impl Into<String>) -> Self {
        self.config.tools.modify_program = program.into();
        self
    }

    /// Sets the screenshot program.
    #[must_use]
    pub fn screenshot_program(mut self, program: impl Into<String>) -> Self {
        self.config.tools.screenshot_program = program.into();
        self
    }

    /// Sets the minimum mode size.
    #[must_use]
    pub fn filter(mut self, filter: ModeFilter) -> Self {
        self.config.filter = filter;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Config, CycleError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
