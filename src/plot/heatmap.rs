use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::coolwarm;
use crate::data::model::Dataset;
use crate::data::summary::correlation;

const COLORBAR_WIDTH: u32 = 130;
const COLORBAR_STEPS: usize = 100;

/// Annotated correlation matrix of every numeric column.
///
/// Row 0 is drawn at the top, so the y segments are filled bottom-up with
/// the last column first.
pub fn draw(dataset: &Dataset, path: &Path) -> Result<()> {
    let corr = correlation(dataset);
    if corr.is_empty() {
        log::warn!("No numeric columns to correlate; heatmap will be blank");
    }
    let n = corr.len();
    let last = n.max(1) as i32 - 1;
    let names = &corr.names;

    let root = BitMapBackend::new(path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let (matrix_area, bar_area) = root.split_horizontally(1000 - COLORBAR_WIDTH);

    let mut chart = ChartBuilder::on(&matrix_area)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d((0..last).into_segmented(), (0..last).into_segmented())?;

    let x_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => names.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let y_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(j) => (n as i32 - 1 - *j)
            .try_into()
            .ok()
            .and_then(|row: usize| names.get(row).cloned())
            .unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n.max(1))
        .y_labels(n.max(1))
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .label_style(("sans-serif", 15))
        .draw()?;

    let cells = (0..n).flat_map(|row| (0..n).map(move |col| (row, col)));
    chart.draw_series(cells.clone().map(|(row, col)| {
        let y = (n - 1 - row) as i32;
        let x = col as i32;
        Rectangle::new(
            [
                (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
            ],
            coolwarm(corr.get(row, col)).filled(),
        )
    }))?;

    chart.draw_series(cells.map(|(row, col)| {
        let r = corr.get(row, col);
        // Dark cells get white text.
        let ink: &'static RGBColor = if r.abs() > 0.6 { &WHITE } else { &BLACK };
        let style = TextStyle::from(("sans-serif", 16).into_font())
            .color(ink)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let label = if r.is_nan() { String::new() } else { format!("{r:.2}") };
        Text::new(
            label,
            (
                SegmentValue::CenterOf(col as i32),
                SegmentValue::CenterOf((n - 1 - row) as i32),
            ),
            style,
        )
    }))?;

    draw_colorbar(&bar_area)?;
    root.present()?;
    Ok(())
}

fn draw_colorbar(area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>) -> Result<()> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(70)
        .margin_left(10)
        .margin_right(10)
        .right_y_label_area_size(50)
        .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .draw()?;

    let step = 2.0 / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|i| {
        let lo = -1.0 + step * i as f64;
        Rectangle::new([(0.0, lo), (1.0, lo + step)], coolwarm(lo + step / 2.0).filled())
    }))?;
    Ok(())
}
