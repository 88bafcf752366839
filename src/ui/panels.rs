use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{Constraint, FieldDomain};
use crate::data::model::CellValue;
use crate::state::{AppState, Tab};

/// Filter edits collected while drawing, applied once the panel is done.
enum FilterAction {
    Toggle(String, CellValue),
    Reset(String),
    Range { field: String, min: f64, max: f64 },
    ClearAll,
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("REPORT FILTERS");
    });
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut actions = Vec::new();
    if ui.button("Clear Filters").clicked() {
        actions.push(FilterAction::ClearAll);
    }

    egui::CollapsingHeader::new("Current Active Filter")
        .default_open(false)
        .show(ui, |ui: &mut Ui| match state.filters.predicate() {
            Ok(p) if p.is_empty() => {
                ui.label("(none)");
            }
            Ok(p) => {
                ui.monospace(p.to_string());
            }
            Err(e) => {
                ui.label(RichText::new(e.to_string()).color(Color32::RED));
            }
        });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in state.filters.fields() {
                let (Some(domain), Some(constraint)) =
                    (state.filters.domain(field), state.filters.constraint(field))
                else {
                    continue;
                };
                match (domain, constraint) {
                    (FieldDomain::Categorical(all), Constraint::Categories(selected)) => {
                        categorical_filter(ui, field, all, selected, &mut actions);
                    }
                    (FieldDomain::Numeric { min, max }, Constraint::Range { min: lo, max: hi }) => {
                        numeric_filter(ui, field, (*min, *max), (*lo, *hi), &mut actions);
                    }
                    _ => {}
                }
            }
        });

    for action in actions {
        match action {
            FilterAction::Toggle(field, value) => state.toggle_filter_value(&field, &value),
            FilterAction::Reset(field) => state.reset_filter(&field),
            FilterAction::Range { field, min, max } => {
                state.set_constraint(&field, Constraint::Range { min, max })
            }
            FilterAction::ClearAll => state.clear_filters(),
        }
    }
}

fn categorical_filter(
    ui: &mut Ui,
    field: &str,
    all: &std::collections::BTreeSet<CellValue>,
    selected: &std::collections::BTreeSet<CellValue>,
    actions: &mut Vec<FilterAction>,
) {
    // Show count of selected / total in the header
    let header_text = format!("{field}  ({}/{})", selected.len(), all.len());
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(field)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("All").clicked() {
                actions.push(FilterAction::Reset(field.to_string()));
            }
            for val in all {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    actions.push(FilterAction::Toggle(field.to_string(), val.clone()));
                }
            }
        });
}

fn numeric_filter(
    ui: &mut Ui,
    field: &str,
    (lo, hi): (f64, f64),
    (mut min, mut max): (f64, f64),
    actions: &mut Vec<FilterAction>,
) {
    ui.strong(field);
    let mut changed = false;
    changed |= ui.add(range_slider(&mut min, (lo, hi), "min")).changed();
    changed |= ui.add(range_slider(&mut max, (lo, hi), "max")).changed();
    if changed {
        actions.push(FilterAction::Range {
            field: field.to_string(),
            min,
            max,
        });
    }
    ui.add_space(4.0);
}

fn range_slider<'a>(value: &'a mut f64, (lo, hi): (f64, f64), label: &str) -> egui::Slider<'a> {
    let slider = egui::Slider::new(value, lo..=hi).text(label);
    if whole_range(lo, hi) {
        slider.integer()
    } else {
        slider
    }
}

/// Sliders step by whole numbers only when both bounds are whole.
fn whole_range(lo: f64, hi: f64) -> bool {
    [lo, hi].iter().all(|v| v.is_finite() && v.fract() == 0.0)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, row counts and tab selector.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Download As CSV"))
                .clicked()
            {
                save_raw_csv_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} employees loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
            if ds.is_empty() {
                ui.label(RichText::new("the data file has no rows").color(Color32::YELLOW));
            }
            if state.filters.is_constrained() {
                ui.label(RichText::new("filtered").italics());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, RichText::new(tab.title()).strong());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open HR data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

/// Ask for a destination and write the unfiltered source data there as CSV.
pub fn save_raw_csv_dialog(state: &mut AppState) {
    let dest = rfd::FileDialog::new()
        .set_title("Download raw data")
        .set_file_name(state.config.download_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(dest) = dest else {
        return;
    };
    if let Err(e) = state.export_raw_csv(&dest) {
        log::error!("Download failed: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_range_only_for_integer_bounds() {
        assert!(whole_range(18.0, 60.0));
        assert!(whole_range(-5.0, 0.0));
        assert!(!whole_range(0.5, 10.0));
        assert!(!whole_range(1.0, 2.75));
        assert!(!whole_range(0.0, f64::INFINITY));
    }
}
