//! Parsing of display tool output into a per-monitor mode catalog.
//!
//! The display tool prints one block per monitor: an unindented header line
//! naming the connector, followed by indented modelines of the form
//!
//! ```text
//! eDP-1 BOE 0x0a0e 0x00000000
//!               3840x2400@59.994  3840x2400  59.99+  [x1.00, x1.25]
//!               2560x1600@59.994  2560x1600  59.99*  [x1.00, x1.25]
//! ```
//!
//! Property lines (anything containing `:`) and interlaced modes are ignored.

use crate::error::ParseError;
use randr_common::{AspectRatio, ModeEntry, RateField, Resolution, ResolutionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Marks a line as an interlaced mode.
const INTERLACED_MARKER: &str = "i@";

/// Marks a property or section header line.
const HEADER_SEPARATOR: char = ':';

/// Minimum size a mode must have to be worth cycling through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFilter {
    /// Modes narrower than this are dropped.
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    /// Modes whose height (width over aspect ratio) is below this are dropped.
    #[serde(default = "default_min_height")]
    pub min_height: u32,
}

fn default_min_width() -> u32 {
    675
}

fn default_min_height() -> u32 {
    530
}

impl Default for ModeFilter {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            min_height: default_min_height(),
        }
    }
}

impl ModeFilter {
    /// Check a resolution against the minimum size.
    pub fn check(&self, text: &str, width: u32, aspect: AspectRatio) -> Result<(), ParseError> {
        if width < self.min_width || aspect.height_below(width, self.min_height) {
            return Err(ParseError::BelowMinimumSize {
                resolution: text.to_string(),
                min_width: self.min_width,
                min_height: self.min_height,
            });
        }
        Ok(())
    }
}

/// What the catalog remembers about one resolution of one monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeInfo {
    pub width: u32,
    pub aspect_ratio: AspectRatio,
    /// Tool specific mode name, usually `WIDTHxHEIGHT@RATE`.
    pub mode_id: String,
    /// Refresh rate as reported, preferred marker removed.
    pub refresh_rate: String,
}

impl ModeInfo {
    /// Numeric refresh rate in Hz, markers ignored.
    pub fn refresh_hz(&self) -> Option<f64> {
        parse_rate(&self.refresh_rate).ok()
    }
}

/// The first three fields of an indented modeline, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modeline<'a> {
    pub mode_id: &'a str,
    pub resolution: &'a str,
    pub rate: RateField,
}

impl<'a> Modeline<'a> {
    /// Split a modeline into its leading fields and classify the rate.
    pub fn split(line: &'a str) -> Result<Self, ParseError> {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(mode_id), Some(resolution), Some(rate)) => Ok(Self {
                mode_id,
                resolution,
                rate: RateField::classify(rate),
            }),
            _ => Err(ParseError::TooFewFields {
                found: line.split_whitespace().count(),
            }),
        }
    }

    /// The current-mode tuple for this line, when the rate carries the
    /// active marker.
    pub fn current_mode(&self, monitor: &str) -> Option<ModeEntry> {
        self.rate.is_active().then(|| {
            ModeEntry::new(
                monitor,
                self.resolution,
                self.mode_id,
                self.rate.decorated(),
            )
        })
    }

    /// Parse the resolution and rate into a catalog entry.
    ///
    /// The size filter is not applied here.
    pub fn validate(&self) -> Result<ModeInfo, ParseError> {
        let resolution: Resolution = self.resolution.parse()?;
        let aspect_ratio = resolution
            .aspect_ratio()
            .ok_or_else(|| ResolutionError::ZeroHeight(self.resolution.to_string()))?;
        parse_rate(self.rate.decorated())?;
        Ok(ModeInfo {
            width: resolution.width,
            aspect_ratio,
            mode_id: self.mode_id.to_string(),
            refresh_rate: self.rate.decorated().to_string(),
        })
    }
}

fn parse_rate(rate: &str) -> Result<f64, ParseError> {
    randr_common::strip_rate_markers(rate)
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidRefreshRate(rate.to_string()))
}

/// The modes of one monitor, in the order the display tool reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorModes {
    name: String,
    modes: Vec<(String, ModeInfo)>,
}

impl MonitorModes {
    /// Create an empty mode map for a monitor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modes: Vec::new(),
        }
    }

    /// Connector name, e.g. `eDP-1`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolutions and their modes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModeInfo)> {
        self.modes.iter().map(|(res, info)| (res.as_str(), info))
    }

    /// Look up a resolution such as `1920x1080`.
    pub fn get(&self, resolution: &str) -> Option<&ModeInfo> {
        self.modes
            .iter()
            .find(|(res, _)| res == resolution)
            .map(|(_, info)| info)
    }

    /// Number of distinct resolutions.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// True when no mode survived filtering.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Store a mode, keeping whichever of an existing and the new entry has
    /// the higher refresh rate. A replaced entry keeps its catalog position.
    ///
    /// Returns false when the new entry was discarded.
    pub fn insert(&mut self, resolution: &str, info: ModeInfo) -> bool {
        let Some(index) = self.modes.iter().position(|(res, _)| res == resolution) else {
            self.modes.push((resolution.to_string(), info));
            return true;
        };
        let existing = &mut self.modes[index].1;
        let new_hz = info.refresh_hz().unwrap_or(f64::NEG_INFINITY);
        let old_hz = existing.refresh_hz().unwrap_or(f64::NEG_INFINITY);
        if new_hz < old_hz {
            return false;
        }
        *existing = info;
        true
    }

    fn clear(&mut self) {
        self.modes.clear();
    }
}

/// Monitor to resolution to mode, in the order the display tool reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    monitors: Vec<MonitorModes>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// All monitors in catalog order.
    pub fn monitors(&self) -> &[MonitorModes] {
        &self.monitors
    }

    /// Find a monitor by connector name.
    pub fn monitor(&self, name: &str) -> Option<&MonitorModes> {
        self.monitors.iter().find(|m| m.name == name)
    }

    /// Number of monitors.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// True when no monitor block was seen.
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Start (or restart) the block for `name` and return its index.
    ///
    /// A monitor seen twice keeps its position but loses its earlier modes.
    fn begin_monitor(&mut self, name: &str) -> usize {
        if let Some(index) = self.monitors.iter().position(|m| m.name == name) {
            self.monitors[index].clear();
            return index;
        }
        self.monitors.push(MonitorModes::new(name));
        self.monitors.len() - 1
    }

    /// Append a monitor. Used to assemble catalogs by hand.
    pub fn push(&mut self, monitor: MonitorModes) {
        self.monitors.push(monitor);
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Catalog: {} monitors", self.monitors.len())?;
        for monitor in &self.monitors {
            write!(f, "\n  {}: {} modes", monitor.name, monitor.len())?;
        }
        Ok(())
    }
}

/// Result of one parse: the catalog and the modes active at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModes {
    pub catalog: Catalog,
    /// Active modes, in the order seen. Applied last to restore the display.
    pub current_modes: Vec<ModeEntry>,
}

/// Line oriented parser for display tool output.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogParser {
    filter: ModeFilter,
}

impl CatalogParser {
    /// Create a parser with the default minimum size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with a custom minimum size.
    pub fn with_filter(filter: ModeFilter) -> Self {
        Self { filter }
    }

    /// Parse the complete output of the display tool.
    ///
    /// Never fails: malformed or filtered modelines are logged and skipped.
    pub fn parse(&self, output: &str) -> ParsedModes {
        let mut parsed = ParsedModes::default();
        let mut current: Option<usize> = None;

        for line in output.lines() {
            if is_ignored(line) {
                continue;
            }

            if !line.starts_with(|c: char| c == ' ' || c == '\t') {
                if let Some(name) = line.split_whitespace().next() {
                    debug!("Found monitor {}", name);
                    current = Some(parsed.catalog.begin_monitor(name));
                }
                continue;
            }

            let Some(index) = current else {
                continue;
            };
            let monitor = &mut parsed.catalog.monitors[index];

            let modeline = match Modeline::split(line) {
                Ok(modeline) => modeline,
                Err(e) => {
                    debug!("Skipping modeline {:?}: {}", line.trim(), e);
                    continue;
                }
            };

            let info = match modeline.validate() {
                Ok(info) => info,
                Err(e @ ParseError::InvalidRefreshRate(_)) => {
                    info!("{}", e);
                    continue;
                }
                Err(e) => {
                    debug!("Skipping {} on {}: {}", modeline.resolution, monitor.name, e);
                    continue;
                }
            };

            // Active modes are restored even when too small to be tested.
            if let Some(entry) = modeline.current_mode(&monitor.name) {
                debug!("Current mode {} on {}", entry.mode_id, entry.monitor);
                parsed.current_modes.push(entry);
            }

            if let Err(e) = self
                .filter
                .check(modeline.resolution, info.width, info.aspect_ratio)
            {
                debug!("Skipping {} on {}: {}", modeline.resolution, monitor.name, e);
                continue;
            }

            if !monitor.insert(modeline.resolution, info) {
                debug!(
                    "Keeping higher refresh rate for {} on {}",
                    modeline.resolution, monitor.name
                );
            }
        }

        parsed
    }
}

fn is_ignored(line: &str) -> bool {
    line.trim().is_empty() || line.contains(HEADER_SEPARATOR) || line.contains(INTERLACED_MARKER)
}

/// Parse display tool output with the default minimum size.
pub fn parse_modes(output: &str) -> ParsedModes {
    CatalogParser::new().parse(output)
}
