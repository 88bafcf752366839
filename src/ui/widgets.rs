use eframe::egui::{self, Color32, RichText, Ui};

// ---------------------------------------------------------------------------
// KPI card
// ---------------------------------------------------------------------------

/// A framed head-count with an optional percentage bar.
pub fn kpi_card(ui: &mut Ui, title: &str, value: usize, pct: Option<f64>, color: Color32) {
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(0x00, 0x3d, 0x4d))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).color(Color32::from_gray(0xd9)));
            let text = match pct {
                Some(p) => format!("{value}  ({p:.2}%)"),
                None => value.to_string(),
            };
            ui.label(RichText::new(text).size(24.0).strong().color(Color32::from_gray(0xd9)));
            let fraction = pct.map_or(1.0, |p| (p / 100.0).clamp(0.0, 1.0) as f32);
            ui.add(egui::ProgressBar::new(fraction).fill(color).desired_height(6.0));
        });
}

// ---------------------------------------------------------------------------
// Section helpers
// ---------------------------------------------------------------------------

/// The guiding questions shown at the top of an analysis section.
pub fn questions<S: AsRef<str>>(ui: &mut Ui, items: &[S]) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.label(RichText::new("QUESTIONS").strong().color(Color32::LIGHT_BLUE));
        for q in items {
            ui.label(format!("• {}", q.as_ref()));
        }
    });
    ui.add_space(4.0);
}

/// Collapsible "View insights..." box closing an analysis section.
pub fn insights(ui: &mut Ui, id_salt: &str, default_open: bool, items: &[String]) {
    egui::CollapsingHeader::new("View insights...")
        .id_salt(id_salt)
        .default_open(default_open)
        .show(ui, |ui: &mut Ui| {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.label(RichText::new("INSIGHTS").strong().color(Color32::from_rgb(0xff, 0xc1, 0x07)));
                for item in items {
                    ui.label(format!("• {item}"));
                }
            });
        });
}

/// Collapsible analysis section.
pub fn section(ui: &mut Ui, title: &str, default_open: bool, add_contents: impl FnOnce(&mut Ui)) {
    egui::CollapsingHeader::new(RichText::new(title).strong().size(16.0))
        .id_salt(title)
        .default_open(default_open)
        .show(ui, add_contents);
    ui.separator();
}
