use eframe::egui::Ui;

use super::{category_colors, plot, widgets};
use crate::color::{ALERT_COLOR, FEMALE_COLOR, MALE_COLOR};
use crate::data::insights;
use crate::data::stats::{self, AttritionRate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Attrition tab
// ---------------------------------------------------------------------------

pub fn render(ui: &mut Ui, state: &AppState) {
    let rows = state.visible_rows();
    let s = stats::attrition_stats(&rows);
    let departments = state.department_colors.as_ref();

    widgets::section(ui, "Analysis: Employee Attrition...", true, |ui: &mut Ui| {
        widgets::questions(
            ui,
            &[
                format!(
                    "Do we have attrition rate higher than {}%?",
                    state.config.targets.max_attrition_pct
                ),
                "What are the factors directly contributes to attrition?".to_string(),
            ],
        );
        ui.columns(3, |cols| {
            rate_card(&mut cols[0], "Company Attrition", &s.company, ALERT_COLOR);
            rate_card(&mut cols[1], "Male Attrition", &s.male, MALE_COLOR);
            rate_card(&mut cols[2], "Female Attrition", &s.female, FEMALE_COLOR);
        });

        let dept = rates(&s.department);
        let roles = rates(&s.job_role);
        ui.columns(2, |cols| {
            plot::category_bars(
                &mut cols[0],
                "attr_dept",
                "Attrition rate by department",
                &dept,
                category_colors(dept.len(), departments),
                "%",
                false,
            );
            plot::category_bars(
                &mut cols[1],
                "attr_role",
                "Attrition rate by job role",
                &roles,
                category_colors(roles.len(), None),
                "%",
                true,
            );
        });

        let charts = [
            ("attr_proximity", "Attrition rate by distance from home", rates(&s.proximity)),
            ("attr_satisfaction", "Attrition rate by job satisfaction", rates(&s.satisfaction)),
            ("attr_age", "Attrition rate by age group", rates(&s.age)),
            ("attr_experience", "Attrition rate by work experience", rates(&s.work_experience)),
        ];
        ui.columns(2, |cols| {
            for (i, (id, title, items)) in charts.iter().enumerate() {
                plot::category_bars(
                    &mut cols[i % 2],
                    id,
                    title,
                    items,
                    category_colors(items.len(), None),
                    "%",
                    false,
                );
            }
        });

        widgets::insights(
            ui,
            "attrition_insights",
            true,
            &insights::attrition(&s, &state.config.targets),
        );
    });
}

fn rate_card(ui: &mut Ui, title: &str, rate: &AttritionRate, color: eframe::egui::Color32) {
    widgets::kpi_card(ui, title, rate.attrited, Some(rate.rate), color);
    ui.small(format!("of {} employees", rate.total));
}

fn rates(groups: &[AttritionRate]) -> Vec<(String, f64)> {
    groups.iter().map(|g| (g.group.clone(), g.rate)).collect()
}
