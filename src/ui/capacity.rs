use eframe::egui::{Color32, Ui};

use super::{plot, widgets};
use crate::color::{ALERT_COLOR, NO_COLOR, YES_COLOR};
use crate::data::insights;
use crate::data::schema::{NO, YES};
use crate::data::stats::{self, DeptFlagPct, FlagCount, Rows};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Capacity planning tab
// ---------------------------------------------------------------------------

pub fn render(ui: &mut Ui, state: &AppState) {
    let rows = state.visible_rows();
    let targets = &state.config.targets;
    let promo = stats::promo_count(&rows);
    let retrench = stats::retrench_count(&rows);
    let promo_by_dept = stats::dept_promo_pct(&rows);
    let retrench_by_dept = stats::dept_retrench_pct(&rows);

    widgets::section(ui, "Overall promotion & retrenchment stats...", true, |ui: &mut Ui| {
        widgets::questions(
            ui,
            &[
                format!("Do we have a healthy promotion rate (min {}%)?", targets.min_promotion_pct),
                format!(
                    "Are we above or below performance-based retrenchment rate (max {}%)?",
                    targets.max_retrenchment_pct
                ),
            ],
        );
        ui.columns(2, |cols| {
            overall_flag(&mut cols[0], "promo", "Promote", "Not Due", &promo, YES_COLOR);
            overall_flag(&mut cols[1], "retrench", "Retrench", "Retained", &retrench, ALERT_COLOR);
        });
        widgets::insights(ui, "capacity_insights", false, &insights::capacity(&promo, &retrench, targets));
    });

    widgets::section(
        ui,
        "Analysis: Department wise promotion & retrenchment...",
        true,
        |ui: &mut Ui| {
            widgets::questions(
                ui,
                &[
                    "How each department is doing in promoting employees?",
                    "Which department has the highest rate of retrenchment?",
                ],
            );
            let (promo_depts, promo_series) = dept_series(&promo_by_dept, YES_COLOR);
            let (retrench_depts, retrench_series) = dept_series(&retrench_by_dept, ALERT_COLOR);
            ui.columns(2, |cols| {
                plot::grouped_bars(
                    &mut cols[0],
                    "promo_dept",
                    "Promotion: % within each department",
                    &promo_depts,
                    &promo_series,
                    "%",
                );
                plot::grouped_bars(
                    &mut cols[1],
                    "retrench_dept",
                    "Retrenchment: % within each department",
                    &retrench_depts,
                    &retrench_series,
                    "%",
                );
            });
            widgets::insights(
                ui,
                "dept_capacity_insights",
                false,
                &insights::dept_capacity(&promo_by_dept, &retrench_by_dept, targets),
            );
        },
    );

    tenure_note(ui, &rows);
}

/// KPI cards and company-wide Yes/No bars for one flag.
fn overall_flag(ui: &mut Ui, id: &str, yes_title: &str, no_title: &str, counts: &FlagCount, yes_color: Color32) {
    ui.columns(2, |cols| {
        widgets::kpi_card(&mut cols[0], yes_title, counts.yes, Some(counts.yes_pct), yes_color);
        widgets::kpi_card(&mut cols[1], no_title, counts.no, Some(counts.no_pct), NO_COLOR);
    });
    let overall = [
        (YES.to_string(), counts.yes as f64),
        (NO.to_string(), counts.no as f64),
    ];
    plot::category_bars(
        ui,
        &format!("{id}_company"),
        &format!("{yes_title}: company wide"),
        &overall,
        |_, label: &str| if label == YES { yes_color } else { NO_COLOR },
        "",
        false,
    );
}

/// Split the department rows into chart groups and a No/Yes series pair.
fn dept_series(by_dept: &[DeptFlagPct], yes_color: Color32) -> (Vec<String>, Vec<(String, Color32, Vec<f64>)>) {
    let mut departments: Vec<String> = Vec::new();
    let mut no = Vec::new();
    let mut yes = Vec::new();
    for row in by_dept {
        if departments.last() != Some(&row.department) {
            departments.push(row.department.clone());
        }
        match row.flag {
            YES => yes.push(row.pct),
            _ => no.push(row.pct),
        }
    }
    let series = vec![
        (NO.to_string(), NO_COLOR, no),
        (YES.to_string(), yes_color, yes),
    ];
    (departments, series)
}

fn tenure_note(ui: &mut Ui, rows: &Rows) {
    let mean_share = if rows.is_empty() {
        0.0
    } else {
        let total: f64 = rows
            .iter()
            .filter_map(|r| r.number(crate::data::schema::PCT_AT_COMPANY))
            .sum();
        stats::round2(total / rows.len() as f64)
    };
    ui.label(format!(
        "On average employees spent {mean_share}% of their working life with the company."
    ));
}
