//! Display mode catalog: parse what a monitor advertises, pick what to test.
//!
//! This crate turns the text printed by a display configuration tool into a
//! structured [`Catalog`] of modes per monitor, remembers which modes were
//! active so they can be restored, and selects the widest mode of every
//! aspect ratio for each monitor.
//!
//! # Modules
//!
//! - [`catalog`] - Line oriented parser and the catalog types
//! - [`selector`] - Best mode per aspect ratio
//! - [`error`] - Reasons a modeline is skipped
//!
//! # Examples
//!
//! ```
//! use randr_catalog::{highest_modes, parse_modes};
//!
//! let output = "eDP-1 BOE 0x0a0e\n    1920x1080@60.000 1920x1080 60.00*+\n";
//! let parsed = parse_modes(output);
//! let selected = highest_modes(&parsed.catalog);
//! assert_eq!(selected[0].resolution, "1920x1080");
//! assert_eq!(parsed.current_modes[0].refresh_rate, "60.00*");
//! ```

pub mod catalog;
pub mod error;
pub mod selector;

#[cfg(test)]
mod proptests;

pub use catalog::{
    parse_modes, Catalog, CatalogParser, ModeFilter, ModeInfo, Modeline, MonitorModes, ParsedModes,
};
pub use error::ParseError;
pub use selector::{highest_modes, highest_modes_for, widest_per_aspect};
