//! Command-line argument parsing for the cycling tool.
//!
//! This module is only available when the `cli` feature is enabled.
//!
//! # Examples
//!
//! ```no_run
//! use randr_cycle::args::Args;
//! use randr_cycle::Config;
//!
//! let args = Args::parse();
//! let config = Config::from_args(&args)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::Config;
use crate::errors::CycleError;
use clap::Parser;
use std::path::PathBuf;

/// Mode cycling command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// A keyword to distinguish the screenshots taken in this run
    #[arg(long, value_name = "KEYWORD", default_value = "")]
    pub keyword: String,

    /// Directory to store screenshots in (default: home directory)
    #[arg(long, value_name = "DIR")]
    pub screenshot_dir: Option<PathBuf>,

    /// Configuration file path (TOML format)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse arguments from an iterator.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// The screenshot directory, falling back to the user's home directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.screenshot_dir.clone().unwrap_or_else(home_dir)
    }
}

fn home_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Create a configuration from command-line arguments.
    ///
    /// Loads the config file named by `--config`, or the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed or
    /// validated.
    pub fn from_args(args: &Args) -> Result<Self, CycleError> {
        match &args.config {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["randr-cycler"]).unwrap();
        assert_eq!(args.keyword, "");
        assert_eq!(args.screenshot_dir, None);
        assert!(!args.verbose);
        assert_eq!(args.output_dir(), home_dir());
    }

    #[test]
    fn test_args_with_options() {
        let args = Args::try_parse_from([
            "randr-cycler",
            "--keyword",
            "test_keyword",
            "--screenshot-dir",
            "folder",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.keyword, "test_keyword");
        assert_eq!(args.output_dir(), PathBuf::from("folder"));
        assert!(args.verbose);
    }

    #[test]
    fn test_config_from_args_without_file() {
        let args = Args::try_parse_from(["randr-cycler"]).unwrap();
        assert_eq!(Config::from_args(&args).unwrap(), Config::default());
    }

    #[test]
    fn test_config_from_args_with_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cycle.toml");
        std::fs::write(&path, "[cycle]\nsettle_ms = 0\n").unwrap();

        let args =
            Args::try_parse_from(["randr-cycler", "-c", path.to_str().unwrap()]).unwrap();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.cycle.settle_ms, 0);
    }

    #[test]
    fn test_config_from_args_missing_file() {
        let args = Args::try_parse_from(["randr-cycler", "-c", "/nonexistent/cycle.toml"]).unwrap();
        assert!(matches!(
            Config::from_args(&args),
            Err(CycleError::Config(_))
        ));
    }
}
