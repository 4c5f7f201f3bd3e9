//! The cycling loop: enumerate, select, apply, capture, restore, archive.

use crate::archive;
use crate::config::Config;
use crate::errors::CycleError;
use crate::tool::DisplayTool;
use randr_catalog::{highest_modes, CatalogParser};
use randr_common::ModeEntry;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What happened to one mode of the work list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOutcome {
    /// The mode was applied and the screen captured.
    Captured,
    /// The mode was applied but the screenshot tool failed.
    CaptureFailed,
    /// The mode-set tool failed.
    ApplyFailed,
}

/// Outcome of one attempted mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleResult {
    pub entry: ModeEntry,
    pub outcome: ModeOutcome,
    /// Screenshot written for this mode, if any.
    pub screenshot: Option<PathBuf>,
}

impl CycleResult {
    /// True unless the mode could not be applied.
    ///
    /// A failed screenshot does not count against the mode.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome != ModeOutcome::ApplyFailed
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Directory the screenshots were written to.
    pub screenshot_dir: PathBuf,
    /// One result per attempted mode, in the order they were applied.
    pub results: Vec<CycleResult>,
    /// The evidence archive, when it could be written.
    pub archive: Option<PathBuf>,
}

impl CycleReport {
    /// Number of modes that could not be applied.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    /// Screenshots captured during the run.
    pub fn screenshots(&self) -> impl Iterator<Item = &Path> {
        self.results.iter().filter_map(|r| r.screenshot.as_deref())
    }

    /// Pass when every mode was applied.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::ModeSetFailures`] carrying the failure count.
    pub fn verdict(&self) -> Result<(), CycleError> {
        match self.failures() {
            0 => Ok(()),
            count => Err(CycleError::ModeSetFailures(count)),
        }
    }
}

/// Directory screenshots of one run go to: `<output_dir>/<base>` with
/// `_<keyword>` appended when a keyword is given.
#[must_use]
pub fn screenshot_path(output_dir: &Path, base_dir_name: &str, keyword: &str) -> PathBuf {
    if keyword.is_empty() {
        output_dir.join(base_dir_name)
    } else {
        output_dir.join(format!("{base_dir_name}_{keyword}"))
    }
}

/// Compute and create the screenshot directory. An existing directory is fine.
///
/// # Errors
///
/// Returns [`CycleError::ScreenshotDir`] if the directory cannot be created.
pub fn create_screenshot_dir(
    output_dir: &Path,
    base_dir_name: &str,
    keyword: &str,
) -> Result<PathBuf, CycleError> {
    let path = screenshot_path(output_dir, base_dir_name, keyword);
    std::fs::create_dir_all(&path).map_err(|source| CycleError::ScreenshotDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Drives a [`DisplayTool`] through the best modes of every monitor.
pub struct Cycler<T> {
    config: Config,
    tool: T,
}

impl<T: DisplayTool> Cycler<T> {
    /// Creates a cycler. The configuration is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config, tool: T) -> Result<Self, CycleError> {
        config.validate()?;
        Ok(Self { config, tool })
    }

    /// The tool this cycler drives.
    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Query the display tool and build the work list: the widest mode of
    /// every aspect ratio, followed by the modes active right now so the
    /// display ends up where it started.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::Enumeration`] if the query tool fails.
    pub async fn work_list(&self) -> Result<Vec<ModeEntry>, CycleError> {
        let output = self
            .tool
            .query_modes()
            .await
            .map_err(CycleError::Enumeration)?;
        let parsed = CatalogParser::with_filter(self.config.filter).parse(&output);
        debug!("{}", parsed.catalog);

        let mut work = highest_modes(&parsed.catalog);
        work.extend(parsed.current_modes);
        Ok(work)
    }

    /// Run a full cycle and return the per-mode results.
    ///
    /// Individual mode failures are recorded, not returned; use
    /// [`CycleReport::verdict`] for the pass/fail decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the screenshot directory cannot be created or the
    /// modes cannot be enumerated.
    pub async fn run(&self, keyword: &str, output_dir: &Path) -> Result<CycleReport, CycleError> {
        let screenshot_dir =
            create_screenshot_dir(output_dir, &self.config.cycle.base_dir_name, keyword)?;
        let work = self.work_list().await?;
        info!("Cycling through {} modes", work.len());

        let mut results = Vec::with_capacity(work.len());
        for entry in work {
            results.push(self.apply(entry, &screenshot_dir).await);
            tokio::time::sleep(self.config.settle()).await;
        }

        let archive = match archive::archive_directory(&screenshot_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("Could not archive {}: {}", screenshot_dir.display(), e);
                None
            }
        };

        Ok(CycleReport {
            screenshot_dir,
            results,
            archive,
        })
    }

    /// Run a full cycle and fold it into a verdict.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::ModeSetFailures`] if any mode failed to apply,
    /// or the error that aborted the run.
    pub async fn cycle(&self, keyword: &str, output_dir: &Path) -> Result<(), CycleError> {
        self.run(keyword, output_dir).await?.verdict()
    }

    async fn apply(&self, entry: ModeEntry, screenshot_dir: &Path) -> CycleResult {
        info!("Set mode {}", entry);

        if let Err(e) = self.tool.set_mode(&entry.monitor, &entry.mode_id).await {
            error!(
                "Failed to set mode {} for output {}: {}",
                entry.mode_id, entry.monitor, e
            );
            return CycleResult {
                entry,
                outcome: ModeOutcome::ApplyFailed,
                screenshot: None,
            };
        }

        let file = screenshot_dir.join(format!(
            "{}.{}",
            entry.evidence_stem(),
            self.config.cycle.screenshot_extension
        ));
        match self.tool.capture_screenshot(&file).await {
            Ok(()) => CycleResult {
                entry,
                outcome: ModeOutcome::Captured,
                screenshot: Some(file),
            },
            Err(e) => {
                warn!(
                    "Could not capture screenshot - you may need to install the package '{}': {}",
                    self.config.tools.screenshot_program, e
                );
                CycleResult {
                    entry,
                    outcome: ModeOutcome::CaptureFailed,
                    screenshot: None,
                }
            }
        }
    }
}
