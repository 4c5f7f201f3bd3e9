//! Reasons a modeline is skipped while building the catalog.

use randr_common::ResolutionError;
use thiserror::Error;

/// Why a single line of display tool output was dropped.
///
/// None of these abort a parse: the parser logs the error and moves on to
/// the next line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Fewer than the three leading fields (mode id, resolution, rate).
    #[error("expected at least 3 fields, found {found}")]
    TooFewFields { found: usize },

    /// The resolution field could not be parsed.
    #[error("invalid resolution: {0}")]
    InvalidResolution(#[from] ResolutionError),

    /// The refresh rate is not a decimal number once markers are removed.
    #[error("Invalid refresh rate format: {0:?}")]
    InvalidRefreshRate(String),

    /// The mode is narrower or shorter than the configured minimum.
    #[error("{resolution} is below the minimum size {min_width}x{min_height}")]
    BelowMinimumSize {
        resolution: String,
        min_width: u32,
        min_height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::TooFewFields { found: 2 };
        assert_eq!(err.to_string(), "expected at least 3 fields, found 2");

        let err = ParseError::BelowMinimumSize {
            resolution: "640x480".to_string(),
            min_width: 675,
            min_height: 530,
        };
        assert_eq!(
            err.to_string(),
            "640x480 is below the minimum size 675x530"
        );
    }

    #[test]
    fn test_from_resolution_error() {
        let err: ParseError = ResolutionError::Format("bogus".to_string()).into();
        assert!(matches!(err, ParseError::InvalidResolution(_)));
    }
}
