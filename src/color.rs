use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Yes/No series colours: "Yes" is the highlighted slice.
pub const YES_COLOR: Color32 = Color32::from_rgb(0x4c, 0x78, 0xa8);
pub const NO_COLOR: Color32 = Color32::from_rgb(0xf5, 0x85, 0x18);
pub const ALERT_COLOR: Color32 = Color32::from_rgb(0xe4, 0x57, 0x56);
pub const MALE_COLOR: Color32 = Color32::from_rgb(0x18, 0x6e, 0xe8);
pub const FEMALE_COLOR: Color32 = Color32::from_rgb(0xff, 0x6d, 0x6d);

// ---------------------------------------------------------------------------
// Color mapping: cell value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a chosen column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the unique values of a column.
    pub fn new(unique_values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<CellValue, Color32> = unique_values
            .iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

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

    /// Colour of a text value, the common case for categorical columns.
    pub fn color_for_text(&self, value: &str) -> Color32 {
        self.color_for(&CellValue::Text(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        let unique: BTreeSet<_> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 4);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_unknown_value_gets_default() {
        let values: BTreeSet<CellValue> =
            [CellValue::Text("Sales".into()), CellValue::Text("HR".into())].into();
        let map = ColorMap::new(&values);
        assert_ne!(map.color_for_text("Sales"), map.color_for_text("HR"));
        assert_eq!(map.color_for_text("Marketing"), Color32::GRAY);
    }
}
