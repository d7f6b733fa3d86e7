//! Report assembly: an ordered block list, then a PDF.
//!
//! ```text
//!   Summary ──┐
//!             ├──► build_report ──► Report { blocks } ──► pdf::render ──► .pdf
//!   plots/  ──┘        (skips missing images)
//! ```

use std::path::{Path, PathBuf};

use crate::data::summary::{Summary, DESCRIBE_WIDTH};
use crate::plot::PlotKind;

pub mod observations;
pub mod pdf;

/// Displayed image size in points.
pub const IMAGE_WIDTH: f32 = 400.0;
pub const IMAGE_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Report blocks
// ---------------------------------------------------------------------------

/// One flowable element of the report, laid out top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    /// Monospaced text; line breaks and alignment are kept.
    Preformatted(String),
    /// Proportional text, word-wrapped to the page.
    Paragraph(String),
    /// Vertical gap in points.
    Spacer(f32),
    /// PNG scaled to `width` × `height` points, centred.
    Image {
        path: PathBuf,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Report {
    /// Paths of every embedded image, in order.
    pub fn images(&self) -> Vec<&Path> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Image { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }
}

/// Lay out the statistics followed by every chart found in `plots_dir`.
///
/// A chart file that does not exist is skipped together with its caption.
pub fn build_report(summary: &Summary, plots_dir: &Path) -> Report {
    let mut blocks = vec![
        Block::Heading("Dataset Info".to_string()),
        Block::Preformatted(summary.info.clone()),
        Block::Spacer(12.0),
        Block::Heading("Dataset Description".to_string()),
        Block::Preformatted(summary.description.render(DESCRIBE_WIDTH)),
        Block::Spacer(12.0),
        Block::Heading("Unique Value Counts".to_string()),
        Block::Preformatted(summary.unique_counts.to_string()),
        Block::Spacer(12.0),
    ];

    for kind in PlotKind::ALL {
        let name = kind.file_name();
        let path = plots_dir.join(name);
        if !path.exists() {
            log::warn!("Skipping {}: file not found", path.display());
            continue;
        }
        blocks.push(Block::Spacer(12.0));
        blocks.push(Block::Image {
            path,
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        });
        blocks.push(Block::Spacer(6.0));
        blocks.push(Block::Paragraph(observations::caption_for(name).to_string()));
    }

    Report {
        title: "Titanic EDA Report".to_string(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, DType, Dataset, Value};
    use crate::data::summary::summarize;

    fn summary() -> Summary {
        let ds = Dataset::from_columns(vec![Column::new(
            "Age",
            DType::Float64,
            vec![Value::Float(20.0), Value::Float(30.0), Value::Float(40.0)],
        )])
        .unwrap();
        summarize(&ds)
    }

    fn write_placeholder_plots(dir: &Path) {
        for kind in PlotKind::ALL {
            image::RgbImage::from_pixel(8, 6, image::Rgb([200, 40, 40]))
                .save(dir.join(kind.file_name()))
                .unwrap();
        }
    }

    fn headings(report: &Report) -> Vec<&str> {
        report
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn statistics_come_first_then_charts_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_placeholder_plots(dir.path());

        let report = build_report(&summary(), dir.path());
        assert_eq!(
            headings(&report),
            vec!["Dataset Info", "Dataset Description", "Unique Value Counts"]
        );
        let names: Vec<String> = report
            .images()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        let expected: Vec<&str> = PlotKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(names, expected);
        assert_eq!(
            report.blocks.last(),
            Some(&Block::Paragraph(observations::caption_for("scatter.png").to_string()))
        );
    }

    #[test]
    fn deleted_image_drops_image_and_caption_only() {
        let dir = tempfile::tempdir().unwrap();
        write_placeholder_plots(dir.path());
        let full = build_report(&summary(), dir.path());

        std::fs::remove_file(dir.path().join("Age_box.png")).unwrap();
        let report = build_report(&summary(), dir.path());

        assert_eq!(report.images().len(), 6);
        assert!(report.images().iter().all(|p| !p.ends_with("Age_box.png")));
        let caption = observations::caption_for("Age_box.png").to_string();
        assert!(!report.blocks.contains(&Block::Paragraph(caption)));
        assert_eq!(headings(&report), headings(&full));
        assert_eq!(report.blocks.len(), full.blocks.len() - 4);

        let bytes = pdf::render(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_plots_dir_keeps_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let report = build_report(&summary(), dir.path());
        assert!(report.images().is_empty());
        assert_eq!(report.blocks.len(), 9);
        assert!(matches!(&report.blocks[4], Block::Preformatted(t) if t.contains("30.000000")));
    }
}
