//! Chart rendering: seven fixed PNGs written with the plotters bitmap backend.
//!
//! ```text
//!   Dataset ──► pairplot   ─┐
//!           ──► heatmap     │
//!           ──► histograms  ├──► plots/*.png
//!           ──► boxplots    │
//!           ──► scatter    ─┘
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::model::{Dataset, Value};

pub mod density;
pub mod distribution;
pub mod heatmap;
pub mod pairplot;
pub mod scatter;

pub const AGE: &str = "Age";
pub const FARE: &str = "Fare";
/// Grouping column for colour and box categories.
pub const HUE: &str = "Survived";
pub const PCLASS: &str = "Pclass";

// ---------------------------------------------------------------------------
// Plot catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Pairplot,
    Heatmap,
    AgeHistogram,
    FareHistogram,
    AgeBox,
    FareBox,
    Scatter,
}

impl PlotKind {
    /// Every chart, in report order.
    pub const ALL: [PlotKind; 7] = [
        PlotKind::Pairplot,
        PlotKind::Heatmap,
        PlotKind::AgeHistogram,
        PlotKind::FareHistogram,
        PlotKind::AgeBox,
        PlotKind::FareBox,
        PlotKind::Scatter,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            PlotKind::Pairplot => "pairplot.png",
            PlotKind::Heatmap => "heatmap.png",
            PlotKind::AgeHistogram => "Age_hist.png",
            PlotKind::FareHistogram => "Fare_hist.png",
            PlotKind::AgeBox => "Age_box.png",
            PlotKind::FareBox => "Fare_box.png",
            PlotKind::Scatter => "scatter.png",
        }
    }

    fn render(self, dataset: &Dataset, path: &Path) -> Result<()> {
        match self {
            PlotKind::Pairplot => pairplot::draw(dataset, &[AGE, FARE], path),
            PlotKind::Heatmap => heatmap::draw(dataset, path),
            PlotKind::AgeHistogram => distribution::draw_histogram(dataset, AGE, path),
            PlotKind::FareHistogram => distribution::draw_histogram(dataset, FARE, path),
            PlotKind::AgeBox => distribution::draw_boxplot(dataset, AGE, path),
            PlotKind::FareBox => distribution::draw_boxplot(dataset, FARE, path),
            PlotKind::Scatter => scatter::draw(dataset, AGE, FARE, path),
        }
    }
}

/// One chart written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArtifact {
    pub kind: PlotKind,
    pub path: PathBuf,
}

/// Render every chart into `dir`, creating it if needed and overwriting
/// existing files. The hardcoded columns are checked before anything is
/// written.
pub fn render_all(dataset: &Dataset, dir: &Path) -> Result<Vec<PlotArtifact>> {
    for name in [AGE, FARE, HUE, PCLASS] {
        dataset.column(name).context("checking plotted columns")?;
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating plots directory {}", dir.display()))?;

    PlotKind::ALL
        .iter()
        .map(|&kind| {
            let path = dir.join(kind.file_name());
            kind.render(dataset, &path)
                .with_context(|| format!("rendering {}", kind.file_name()))?;
            log::info!("Wrote {}", path.display());
            Ok(PlotArtifact { kind, path })
        })
        .collect()
}

/// Colour map over the distinct, non-missing hue values.
fn hue_colors(dataset: &Dataset) -> Result<ColorMap> {
    let values: BTreeSet<Value> = dataset.column(HUE)?.unique_values();
    Ok(ColorMap::new(HUE, &values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, DType};

    #[test]
    fn file_names_are_unique_and_ordered() {
        let names: Vec<&str> = PlotKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "pairplot.png",
                "heatmap.png",
                "Age_hist.png",
                "Fare_hist.png",
                "Age_box.png",
                "Fare_box.png",
                "scatter.png",
            ]
        );
    }

    #[test]
    fn missing_column_aborts_before_creating_dir() {
        let ds = Dataset::from_columns(vec![Column::new(
            AGE,
            DType::Float64,
            vec![Value::Float(1.0)],
        )])
        .unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("plots");
        assert!(render_all(&ds, &dir).is_err());
        assert!(!dir.exists());
    }
}
