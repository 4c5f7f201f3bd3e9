//! Error types for mode cycling.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single external tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("{program} exited with status {code:?}: {stderr}")]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The program did not finish within the configured timeout.
    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
}

impl ToolError {
    /// Name of the program that failed.
    #[must_use]
    pub fn program(&self) -> &str {
        match self {
            Self::Spawn { program, .. }
            | Self::ExitStatus { program, .. }
            | Self::Timeout { program, .. } => program,
        }
    }
}

/// Errors that end a cycling run or make up its verdict.
#[derive(Debug, Error)]
pub enum CycleError {
    /// The mode query tool failed, so there is nothing to cycle through.
    #[error("Failed to enumerate display modes: {0}")]
    Enumeration(#[source] ToolError),

    /// The screenshot directory could not be created.
    #[error("Failed to create screenshot directory {path:?}: {source}")]
    ScreenshotDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One or more modes could not be applied.
    #[error("There are {0} fails during test")]
    ModeSetFailures(usize),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CycleError {
    /// Returns true if the run was aborted before every mode was attempted.
    ///
    /// A [`CycleError::ModeSetFailures`] verdict is not fatal: the run went to
    /// completion and restored the original modes.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ModeSetFailures(_))
    }

    /// Number of failed mode applications, if this is a verdict.
    #[must_use]
    pub fn failure_count(&self) -> Option<usize> {
        match self {
            Self::ModeSetFailures(count) => Some(*count),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization() {
        assert!(!CycleError::ModeSetFailures(2).is_fatal());
        assert_eq!(CycleError::ModeSetFailures(2).failure_count(), Some(2));

        let err = CycleError::Enumeration(ToolError::Spawn {
            program: "gnome-randr".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert!(err.is_fatal());
        assert_eq!(err.failure_count(), None);
        assert!(CycleError::Config("empty".to_string()).is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = CycleError::ModeSetFailures(3);
        assert_eq!(err.to_string(), "There are 3 fails during test");

        let err = ToolError::ExitStatus {
            program: "gnome-randr".to_string(),
            code: Some(1),
            stderr: "no such mode".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "gnome-randr exited with status Some(1): no such mode"
        );
        assert_eq!(err.program(), "gnome-randr");

        let err = ToolError::Timeout {
            program: "gnome-screenshot".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert!(err.to_string().contains("30s"));
    }
}
