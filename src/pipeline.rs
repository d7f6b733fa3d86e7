use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::data::loader::load_csv;
use crate::data::summary::summarize;
use crate::plot::{self, PlotArtifact};
use crate::report::{self, Report};

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Input and output locations of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub input: PathBuf,
    pub plots_dir: PathBuf,
    pub report: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::rooted_at(Path::new(""))
    }
}

impl Paths {
    /// The fixed layout (`train.csv`, `plots/`, `Titanic_EDA_Report.pdf`)
    /// placed under `root`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            input: root.join("train.csv"),
            plots_dir: root.join("plots"),
            report: root.join("Titanic_EDA_Report.pdf"),
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub plots: Vec<PlotArtifact>,
    pub report: Report,
}

/// Load → describe → plot → annotate → write PDF.
///
/// Nothing is written before the input has been parsed.
pub fn run(paths: &Paths) -> Result<RunOutcome> {
    let dataset = load_csv(&paths.input)?;
    if dataset.is_empty() {
        log::warn!("{} has no data rows", paths.input.display());
    }
    let summary = summarize(&dataset);
    log::debug!("Dataset info:\n{}", summary.info);
    log::info!(
        "Described numeric columns {:?}",
        summary.description.column_names()
    );

    let plots = plot::render_all(&dataset, &paths.plots_dir)?;
    let report = report::build_report(&summary, &paths.plots_dir);
    report::pdf::write_pdf(&report, &paths.report)?;

    Ok(RunOutcome { plots, report })
}
