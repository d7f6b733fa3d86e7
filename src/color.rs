use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// The first hue sits at 210° (blue) so a two-level grouping reads as
/// blue / orange.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (210.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.45);
            let rgb: Srgb = hsl.into_color();
            to_rgb(rgb)
        })
        .collect()
}

fn to_rgb(rgb: Srgb) -> RGBColor {
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging scale for correlation cells
// ---------------------------------------------------------------------------

const COOL: (f32, f32, f32) = (0.230, 0.299, 0.754);
const NEUTRAL: (f32, f32, f32) = (0.865, 0.865, 0.865);
const WARM: (f32, f32, f32) = (0.706, 0.016, 0.150);

/// Cool-warm colour for `value` in `[-1, 1]`, interpolated in linear RGB.
/// NaN maps to white.
pub fn coolwarm(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(255, 255, 255);
    }
    let t = value.clamp(-1.0, 1.0) as f32;
    let lin = |c: (f32, f32, f32)| -> LinSrgb { Srgb::new(c.0, c.1, c.2).into_linear() };
    let mixed = if t < 0.0 {
        lin(NEUTRAL).mix(lin(COOL), -t)
    } else {
        lin(NEUTRAL).mix(lin(WARM), t)
    };
    let rgb: Srgb = mixed.into_color();
    to_rgb(rgb)
}

// ---------------------------------------------------------------------------
// Color mapping: grouping value → RGBColor
// ---------------------------------------------------------------------------

/// Maps the distinct values of a hue column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<Value, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &BTreeSet<Value>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<Value, RGBColor> = unique_values
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &Value) -> RGBColor {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (value label → colour) in value order.
    pub fn legend_entries(&self) -> Vec<(String, RGBColor)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.to_string(), *c))
            .collect()
    }
}
