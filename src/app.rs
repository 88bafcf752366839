use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, Tab};
use crate::ui::{attrition, capacity, panels, summary};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HrDashboardApp {
    pub state: AppState,
}

impl HrDashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let visuals = if config.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        cc.egui_ctx.set_visuals(visuals);

        let data_file = config.data_file.clone();
        let mut state = AppState::new(config);
        state.open(&data_file);
        Self { state }
    }
}

impl eframe::App for HrDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_data_file(Instant::now());
        ctx.request_repaint_after(Duration::from_secs(1));

        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.state.config.app_title);
            ui.separator();

            if self.state.dataset.is_none() {
                ui.label(
                    egui::RichText::new("No data to show. Use File → Open… to pick an HR data file.")
                        .color(egui::Color32::RED),
                );
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.active_tab {
                    Tab::Summary => summary::render(ui, &mut self.state),
                    Tab::Capacity => capacity::render(ui, &self.state),
                    Tab::Attrition => attrition::render(ui, &self.state),
                });
        });
    }
}
