use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::density::{bin_edges, histogram, kde_curve, padded_range, BoxStats};
use super::{hue_colors, HUE};
use crate::data::filter::{group_rows, numeric_at};
use crate::data::model::Dataset;

const HIST_COLOR: RGBColor = RGBColor(49, 115, 176);
const KDE_POINTS: usize = 200;
/// Share of a group's segment taken by its box.
const BOX_WIDTH: f64 = 0.6;

// ---------------------------------------------------------------------------
// Histogram with density overlay
// ---------------------------------------------------------------------------

/// Histogram of `column` (missing values dropped) with a KDE curve scaled
/// to the bin counts.
pub fn draw_histogram(dataset: &Dataset, column: &str, path: &Path) -> Result<()> {
    let values = dataset.column(column)?.numeric_dropna()?;
    let edges = bin_edges(&values);
    let bins = histogram(&values, &edges);

    let x_range = match (edges.first(), edges.last()) {
        (Some(&lo), Some(&hi)) => lo..hi,
        _ => 0.0..1.0,
    };
    let bin_width = edges.get(1).zip(edges.first()).map(|(b, a)| b - a).unwrap_or(1.0);
    let scale = values.len() as f64 * bin_width;
    let curve: Vec<(f64, f64)> = kde_curve(&values, x_range.clone(), KDE_POINTS)
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect();

    let top = bins
        .iter()
        .map(|b| b.count as f64)
        .chain(curve.iter().map(|p| p.1))
        .fold(1.0, f64::max)
        * 1.1;

    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Histogram of {column}"), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, 0f64..top)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(column)
        .y_desc("Count")
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], HIST_COLOR.mix(0.6).filled())
    }))?;
    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], WHITE.stroke_width(1))
    }))?;
    chart.draw_series(LineSeries::new(curve, HIST_COLOR.stroke_width(2)))?;

    root.present()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Boxplot per hue group
// ---------------------------------------------------------------------------

/// One box per `Survived` group: quartile box, median line, whiskers to
/// the furthest values within 1.5·IQR and the points beyond them.
pub fn draw_boxplot(dataset: &Dataset, column: &str, path: &Path) -> Result<()> {
    let all_rows: Vec<usize> = (0..dataset.len()).collect();
    let groups = group_rows(dataset, HUE, &all_rows)?;
    let colors = hue_colors(dataset)?;

    let mut series = Vec::with_capacity(groups.len());
    for (key, rows) in &groups {
        let values = numeric_at(dataset, column, rows)?;
        if let Some(stats) = BoxStats::from_values(&values) {
            series.push((key.clone(), stats, values));
        }
    }

    let labels: Vec<String> = series.iter().map(|(k, _, _)| k.to_string()).collect();
    let y_range = padded_range(series.iter().flat_map(|(_, _, values)| values.iter().copied()));
    let last = series.len().max(1) as i32 - 1;

    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Boxplot of {column} by Survival"), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d((0..last).into_segmented(), y_range)?;

    let label_of = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&label_of)
        .x_desc(HUE)
        .y_desc(column)
        .draw()?;

    for (i, (key, stats, values)) in series.iter().enumerate() {
        let color = colors.color_for(key);
        let x = SegmentValue::CenterOf(i as i32);

        // Box and whiskers go onto the root area in pixels so the box can
        // take a fraction of the segment width.
        let (cx, _) = chart.backend_coord(&(x.clone(), stats.median));
        let (left, _) = chart.backend_coord(&(SegmentValue::Exact(i as i32), stats.median));
        let half = ((cx - left) as f64 * BOX_WIDTH) as i32;
        let py = |y: f64| chart.backend_coord(&(x.clone(), y)).1;
        let (lo, q1, median, q3, hi) = (
            py(stats.lower_whisker),
            py(stats.q1),
            py(stats.median),
            py(stats.q3),
            py(stats.upper_whisker),
        );

        let outline = color.stroke_width(2);
        root.draw(&Rectangle::new([(cx - half, q3), (cx + half, q1)], color.mix(0.35).filled()))?;
        root.draw(&Rectangle::new([(cx - half, q3), (cx + half, q1)], outline))?;
        root.draw(&PathElement::new(vec![(cx - half, median), (cx + half, median)], color.stroke_width(3)))?;
        for (edge, end) in [(q3, hi), (q1, lo)] {
            root.draw(&PathElement::new(vec![(cx, edge), (cx, end)], outline))?;
            root.draw(&PathElement::new(vec![(cx - half / 2, end), (cx + half / 2, end)], outline))?;
        }

        chart.draw_series(
            values
                .iter()
                .copied()
                .filter(|&v| stats.is_outlier(v))
                .map(|v| Circle::new((x.clone(), v), 3, color.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}
