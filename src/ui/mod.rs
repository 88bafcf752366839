//! egui front-end: panels, tabs and the chart/card building blocks they use.

pub mod attrition;
pub mod capacity;
pub mod panels;
pub mod plot;
pub mod summary;
pub mod widgets;

use std::collections::BTreeMap;

use eframe::egui::Color32;

use crate::color::{generate_palette, ColorMap};
use crate::data::model::CellValue;

/// Turn a value-keyed aggregate into display labels.
pub(crate) fn labelled<T: Copy>(map: &BTreeMap<CellValue, T>) -> Vec<(String, T)> {
    map.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Colour picker for `n` categories: the department map when it knows the
/// label, otherwise an evenly spaced palette.
pub(crate) fn category_colors(n: usize, departments: Option<&ColorMap>) -> impl Fn(usize, &str) -> Color32 + '_ {
    let palette = generate_palette(n);
    move |i: usize, label: &str| {
        let known = departments
            .map(|m| m.color_for_text(label))
            .filter(|c| *c != Color32::GRAY);
        known.unwrap_or_else(|| palette.get(i).copied().unwrap_or(Color32::GRAY))
    }
}
