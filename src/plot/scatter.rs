use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::density::padded_range;
use super::{hue_colors, HUE};
use crate::data::filter::{group_rows, numeric_pairs_at};
use crate::data::model::Dataset;

/// `x` against `y`, one colour per `Survived` group, legend in the corner.
pub fn draw(dataset: &Dataset, x: &str, y: &str, path: &Path) -> Result<()> {
    let all_rows: Vec<usize> = (0..dataset.len()).collect();
    let groups = group_rows(dataset, HUE, &all_rows)?;
    let colors = hue_colors(dataset)?;

    let mut series = Vec::with_capacity(groups.len());
    for (key, rows) in &groups {
        series.push((key, numeric_pairs_at(dataset, x, y, rows)?));
    }
    let x_range = padded_range(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0)));
    let y_range = padded_range(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1)));

    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Scatterplot of {x} vs {y}"), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;
    chart.configure_mesh().x_desc(x).y_desc(y).draw()?;

    for (key, points) in &series {
        let color = colors.color_for(key);
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(px, py)| Circle::new((px, py), 3, color.mix(0.75).filled())),
            )?
            .label(key.to_string())
            .legend(move |(lx, ly)| Circle::new((lx, ly), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
