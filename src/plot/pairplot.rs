use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::density::{bin_edges, histogram, padded_range};
use super::{hue_colors, HUE};
use crate::color::ColorMap;
use crate::data::filter::{complete_rows, group_rows, numeric_at, numeric_pairs_at};
use crate::data::model::{Dataset, Value};

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const PANEL_SIZE: u32 = 250;
const LEGEND_WIDTH: u32 = 110;

/// Grid of `vars` × `vars` panels over rows with `vars[0]` present:
/// layered per-group histograms on the diagonal, scatterplots elsewhere.
pub fn draw(dataset: &Dataset, vars: &[&str], path: &Path) -> Result<()> {
    let rows = complete_rows(dataset, &vars[..1])?;
    let groups = group_rows(dataset, HUE, &rows)?;
    let colors = hue_colors(dataset)?;

    let k = vars.len().max(1);
    let grid_px = PANEL_SIZE * k as u32;
    let root = BitMapBackend::new(path, (grid_px + LEGEND_WIDTH, grid_px)).into_drawing_area();
    root.fill(&WHITE)?;
    let (grid, legend) = root.split_horizontally(grid_px);

    for (idx, panel) in grid.split_evenly((k, k)).iter().enumerate() {
        let (r, c) = (idx / k, idx % k);
        if r == c {
            diagonal(panel, dataset, vars[r], &rows, &groups, &colors)?;
        } else {
            off_diagonal(panel, dataset, vars[c], vars[r], &rows, &groups, &colors)?;
        }
    }
    draw_legend(&legend, &colors)?;

    root.present()?;
    Ok(())
}

fn diagonal(
    panel: &Panel<'_>,
    dataset: &Dataset,
    var: &str,
    rows: &[usize],
    groups: &BTreeMap<Value, Vec<usize>>,
    colors: &ColorMap,
) -> Result<()> {
    // Shared bins so the layers line up.
    let edges = bin_edges(&numeric_at(dataset, var, rows)?);
    let layers = groups
        .iter()
        .map(|(key, members)| {
            let values = numeric_at(dataset, var, members)?;
            Ok((colors.color_for(key), histogram(&values, &edges)))
        })
        .collect::<Result<Vec<_>>>()?;

    let x_range = match (edges.first(), edges.last()) {
        (Some(&lo), Some(&hi)) => lo..hi,
        _ => 0.0..1.0,
    };
    let top = layers
        .iter()
        .flat_map(|(_, bins)| bins.iter().map(|b| b.count as f64))
        .fold(1.0, f64::max)
        * 1.1;

    let mut chart = ChartBuilder::on(panel)
        .margin(8)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(x_range, 0f64..top)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_desc(var)
        .y_desc("Count")
        .draw()?;

    for (color, bins) in &layers {
        chart.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], color.mix(0.45).filled())
        }))?;
    }
    Ok(())
}

fn off_diagonal(
    panel: &Panel<'_>,
    dataset: &Dataset,
    x: &str,
    y: &str,
    rows: &[usize],
    groups: &BTreeMap<Value, Vec<usize>>,
    colors: &ColorMap,
) -> Result<()> {
    let all = numeric_pairs_at(dataset, x, y, rows)?;
    let mut chart = ChartBuilder::on(panel)
        .margin(8)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(
            padded_range(all.iter().map(|p| p.0)),
            padded_range(all.iter().map(|p| p.1)),
        )?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_desc(x)
        .y_desc(y)
        .draw()?;

    for (key, members) in groups {
        let color = colors.color_for(key);
        let points = numeric_pairs_at(dataset, x, y, members)?;
        chart.draw_series(
            points
                .into_iter()
                .map(|p| Circle::new(p, 2, color.mix(0.7).filled())),
        )?;
    }
    Ok(())
}

fn draw_legend(area: &Panel<'_>, colors: &ColorMap) -> Result<()> {
    let (_, height) = area.dim_in_pixel();
    let mut y = height as i32 / 2 - 30;
    area.draw(&Text::new(colors.column.as_str(), (15, y), ("sans-serif", 16).into_font()))?;
    for (label, color) in colors.legend_entries() {
        y += 24;
        area.draw(&Circle::new((22, y + 8), 5, color.filled()))?;
        area.draw(&Text::new(label, (35, y), ("sans-serif", 15).into_font()))?;
    }
    Ok(())
}
