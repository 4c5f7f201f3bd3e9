//! Common types shared by the display mode catalog and the cycling runner.
//!
//! This crate provides the small value types every other crate speaks in:
//! - [`Resolution`] - a `WIDTHxHEIGHT` pair parsed from modeline text
//! - [`AspectRatio`] - width/height reduced to lowest terms, compared exactly
//! - [`RateField`] - the refresh rate column, classified before it is cleaned
//! - [`ModeEntry`] - one mode to apply: monitor, resolution, mode id, rate

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Marker the display tool appends to the rate of the currently active mode.
pub const ACTIVE_MARKER: char = '*';

/// Marker the display tool appends to the rate of the preferred mode.
pub const PREFERRED_MARKER: char = '+';

/// Errors produced while parsing a resolution string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The text is not of the form `WIDTHxHEIGHT`.
    #[error("expected WIDTHxHEIGHT, got {0:?}")]
    Format(String),

    /// One of the dimensions is not an unsigned integer.
    #[error("invalid dimension {0:?}")]
    Dimension(String),

    /// The height is zero, so no aspect ratio exists.
    #[error("zero height in {0:?}")]
    ZeroHeight(String),
}

/// A display resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Exact aspect ratio of this resolution.
    ///
    /// Returns `None` for a zero height.
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        AspectRatio::new(self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once('x')
            .ok_or_else(|| ResolutionError::Format(s.to_string()))?;
        let width: u32 = width
            .parse()
            .map_err(|_| ResolutionError::Dimension(width.to_string()))?;
        let height: u32 = height
            .parse()
            .map_err(|_| ResolutionError::Dimension(height.to_string()))?;
        if height == 0 {
            return Err(ResolutionError::ZeroHeight(s.to_string()));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Width over height as a fraction in lowest terms.
///
/// Two ratios are equal only when their reduced numerators and denominators
/// match, so `1920x1080` and `3840x2160` share the ratio `16:9` while
/// `1366x768` (`683:384`) does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    numer: u32,
    denom: u32,
}

impl AspectRatio {
    /// Reduce `width / height`. Returns `None` when `height` is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if height == 0 {
            return None;
        }
        let divisor = gcd(width, height);
        Some(Self {
            numer: width / divisor,
            denom: height / divisor,
        })
    }

    /// True when `width / self` is strictly below `limit`, compared exactly.
    pub fn height_below(&self, width: u32, limit: u32) -> bool {
        u64::from(width) * u64::from(self.denom) < u64::from(limit) * u64::from(self.numer)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numer, self.denom)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    // gcd(0, 0) only arises for a zero height, which `new` rejects first.
    a.max(1)
}

/// The refresh rate column of a modeline, classified before cleaning.
///
/// Detection of the active marker must happen on the raw text, so
/// [`RateField::classify`] records it before the preferred marker is dropped.
/// [`strip_rate_markers`] yields the bare number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateField {
    decorated: String,
    active: bool,
}

impl RateField {
    /// Classify a raw rate token such as `59.99*+`.
    pub fn classify(raw: &str) -> Self {
        Self {
            decorated: raw.replace(PREFERRED_MARKER, ""),
            active: raw.contains(ACTIVE_MARKER),
        }
    }

    /// The mode was active when the display tool was queried.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rate with the preferred marker removed but the active marker kept.
    pub fn decorated(&self) -> &str {
        &self.decorated
    }
}

/// Remove the active and preferred markers from a rate string.
pub fn strip_rate_markers(rate: &str) -> String {
    rate.chars()
        .filter(|&c| c != ACTIVE_MARKER && c != PREFERRED_MARKER)
        .collect()
}

/// A single mode to apply: which monitor, which resolution, the tool's
/// mode identifier and the refresh rate as reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModeEntry {
    pub monitor: String,
    pub resolution: String,
    pub mode_id: String,
    pub refresh_rate: String,
}

impl ModeEntry {
    /// Create a new mode entry.
    pub fn new(
        monitor: impl Into<String>,
        resolution: impl Into<String>,
        mode_id: impl Into<String>,
        refresh_rate: impl Into<String>,
    ) -> Self {
        Self {
            monitor: monitor.into(),
            resolution: resolution.into(),
            mode_id: mode_id.into(),
            refresh_rate: refresh_rate.into(),
        }
    }

    /// `<monitor>_<resolution>`, the stem used for evidence file names.
    pub fn evidence_stem(&self) -> String {
        format!("{}_{}", self.monitor, self.resolution)
    }
}

impl fmt::Display for ModeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} for output {}",
            self.resolution,
            strip_rate_markers(&self.refresh_rate),
            self.monitor
        )
    }
}
