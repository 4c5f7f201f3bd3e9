//! Display mode cycling for hardware certification.
//!
//! This crate exercises a display's output modes: it asks the display tool
//! which modes every monitor advertises, picks the widest mode of each aspect
//! ratio, applies them one after another while capturing a screenshot of
//! each, and finally reapplies the modes that were active before the run.
//!
//! # Quick Start
//!
//! ```no_run
//! use randr_cycle::{CommandTool, Config, Cycler};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), randr_cycle::CycleError> {
//! let config = Config::default();
//! let cycler = Cycler::new(config.clone(), CommandTool::new(&config))?;
//! let report = cycler.run("hdmi", Path::new("/tmp")).await?;
//! println!("{} modes failed", report.failures());
//! report.verdict()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Only modes that fail to apply count against the run. A failed screenshot
//! is logged as a warning and a failed archive is ignored. Failing to
//! enumerate modes aborts the run before any mode is touched.
//!
//! Modes are always applied strictly one at a time: changing modes
//! concurrently would race on the shared display state.

#![forbid(unsafe_code)]

pub mod archive;
pub mod config;
pub mod cycle;
pub mod errors;
pub mod tool;

// Optional CLI support
#[cfg(feature = "cli")]
pub mod args;

// Re-exports
pub use config::Config;
pub use cycle::{CycleReport, CycleResult, Cycler, ModeOutcome};
pub use errors::{CycleError, ToolError};
pub use tool::{CommandTool, DisplayTool};
