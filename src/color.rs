use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

/// Red → yellow → green scale for `t` in `[0, 1]` (values outside are clamped).
pub fn red_yellow_green(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    hsl_to_color32(Hsl::new(t as f32 * 120.0, 0.70, 0.45))
}

// ---------------------------------------------------------------------------
// Color mapping: categorical value → Color32
// ---------------------------------------------------------------------------

/// Maps unique values of a categorical column to distinct colours, so a
/// category keeps its colour while filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's unique values.
    pub fn new(unique_values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Colour for a value given as its display text.
    pub fn color_for_text(&self, text: &str) -> Color32 {
        self.color_for(&CellValue::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colours() {
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn scale_runs_from_red_to_green() {
        let low = red_yellow_green(0.0);
        let high = red_yellow_green(1.0);
        assert!(low.r() > low.g());
        assert!(high.g() > high.r());
        assert_eq!(red_yellow_green(-3.0), low);
    }

    #[test]
    fn unknown_values_fall_back_to_gray() {
        let values: BTreeSet<CellValue> = ["hibrido", "remoto"].iter().map(|&v| v.into()).collect();
        let map = ColorMap::new(&values);
        assert_ne!(map.color_for_text("remoto"), Color32::GRAY);
        assert_eq!(map.color_for_text("lua"), Color32::GRAY);
    }
}
