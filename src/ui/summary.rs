use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use super::{category_colors, labelled, plot, widgets};
use crate::color::{FEMALE_COLOR, MALE_COLOR, YES_COLOR};
use crate::data::insights;
use crate::data::model::{CellValue, EmployeeRecord};
use crate::data::schema;
use crate::data::stats::{self, Rows};
use crate::state::AppState;

const SAMPLE_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Executive summary tab
// ---------------------------------------------------------------------------

pub fn render(ui: &mut Ui, state: &mut AppState) {
    let rows = state.visible_rows();
    let columns = state
        .dataset
        .as_ref()
        .map(|ds| ds.column_names.clone())
        .unwrap_or_default();
    let departments = state.department_colors.as_ref();

    let mut download = false;
    widgets::section(ui, "View sample data | Download dataset...", false, |ui: &mut Ui| {
        ui.label(egui::RichText::new("Top 5 rows").strong());
        let head: Vec<&EmployeeRecord> = rows.iter().take(SAMPLE_ROWS).copied().collect();
        sample_table(ui, "head_rows", &columns, &head);
        ui.label(egui::RichText::new("Bottom 5 rows").strong());
        let tail_start = rows.len().saturating_sub(SAMPLE_ROWS);
        sample_table(ui, "tail_rows", &columns, &rows[tail_start..]);
        download = ui.button("Download As CSV").clicked();
    });

    widgets::section(ui, "View Gender Stats...", true, |ui: &mut Ui| {
        widgets::questions(ui, &["Do we have a balanced workforce in terms of gender?"]);
        gender_cards(ui, &rows);
        widgets::insights(ui, "gender_insights", false, &insights::gender(&stats::gender_count(&rows)));
    });

    widgets::section(ui, "Analysis: Age & Marital Status...", true, |ui: &mut Ui| {
        widgets::questions(
            ui,
            &[
                "Are we an ageing or young organization?",
                "Do we need to recruit more young or more experienced people?",
                "Should we target recruiting employees for a particular age group and gender?",
                "Do we have a balanced distribution of employees by their marital status?",
            ],
        );
        age_plots(ui, &rows);
        widgets::insights(ui, "age_insights", true, &insights::age_and_marital(&rows));
    });

    widgets::section(ui, "Analysis: Departments...", true, |ui: &mut Ui| {
        widgets::questions(
            ui,
            &[
                "Which department is the largest employer?",
                "Do we have balanced gender distribution in each department?",
                "In which department do people stick to their manager longest?",
                "In which department do people tend to do more overtime?",
                "Which department is the best paymaster?",
            ],
        );
        dept_plots(ui, &rows, departments);
        widgets::insights(ui, "dept_insights", false, &insights::departments(&rows));
    });

    widgets::section(ui, "Analysis: Work experience...", true, |ui: &mut Ui| {
        widgets::questions(
            ui,
            &[
                "Do we have a balanced distribution of employees based on their work experience?",
                "Do we need targeted hiring for a particular work experience range?",
                "Do employees prefer to work with our company for most of their working life?",
            ],
        );
        experience_plots(ui, &rows);
        widgets::insights(ui, "exp_insights", true, &insights::experience(&rows));
    });

    if download {
        super::panels::save_raw_csv_dialog(state);
    }
}

fn sample_table(ui: &mut Ui, id: &str, columns: &[String], rows: &[&EmployeeRecord]) {
    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            let mut table = TableBuilder::new(ui).striped(true).vscroll(false);
            for _ in columns {
                table = table.column(Column::auto().at_least(60.0));
            }
            table
                .header(20.0, |mut header| {
                    for col in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col);
                        });
                    }
                })
                .body(|mut body| {
                    for rec in rows {
                        body.row(18.0, |mut row| {
                            for col in columns {
                                row.col(|ui: &mut Ui| {
                                    let text = rec.get(col).map(CellValue::to_string).unwrap_or_default();
                                    ui.label(text);
                                });
                            }
                        });
                    }
                });
        });
    });
}

fn gender_cards(ui: &mut Ui, rows: &Rows) {
    let g = stats::gender_count(rows);
    ui.columns(3, |cols| {
        widgets::kpi_card(&mut cols[0], "Total Employees", g.total, None, YES_COLOR);
        widgets::kpi_card(&mut cols[1], "Males", g.male, Some(g.male_pct), MALE_COLOR);
        widgets::kpi_card(&mut cols[2], "Females", g.female, Some(g.female_pct), FEMALE_COLOR);
    });
}

fn age_plots(ui: &mut Ui, rows: &Rows) {
    let by_gender = labelled(&stats::box_summary(rows, schema::GENDER, schema::AGE));
    let mut marital: Vec<(String, f64)> = labelled(&stats::group_counts(rows, schema::MARITAL_STATUS))
        .into_iter()
        .map(|(label, n)| (label, n as f64))
        .collect();
    marital.sort_by(|a, b| a.1.total_cmp(&b.1));
    let by_marital = labelled(&stats::box_summary(rows, schema::MARITAL_STATUS, schema::AGE));

    ui.columns(2, |cols| {
        plot::histogram(
            &mut cols[0],
            "age_hist",
            "Employee's age distribution overall",
            &stats::histogram(rows, schema::AGE, 2.0),
            2.0,
            YES_COLOR,
        );
        plot::box_plot(
            &mut cols[1],
            "age_gender_box",
            "Employee's age distribution by gender",
            &by_gender,
            category_colors(by_gender.len(), None),
        );
        plot::category_bars(
            &mut cols[0],
            "marital_counts",
            "Employee count by marital-status",
            &marital,
            category_colors(marital.len(), None),
            "",
            false,
        );
        plot::box_plot(
            &mut cols[1],
            "age_marital_box",
            "Employee's age distribution by marital-status",
            &by_marital,
            category_colors(by_marital.len(), None),
        );
    });
}

fn dept_plots(ui: &mut Ui, rows: &Rows, departments: Option<&crate::color::ColorMap>) {
    let counts = stats::group_counts2(rows, schema::DEPARTMENT, schema::GENDER);
    let depts: Vec<String> = stats::group_counts(rows, schema::DEPARTMENT)
        .keys()
        .map(CellValue::to_string)
        .collect();
    let series_for = |gender: &str| -> Vec<f64> {
        depts
            .iter()
            .map(|d| {
                let key = (CellValue::Text(d.clone()), CellValue::Text(gender.to_string()));
                counts.get(&key).copied().unwrap_or(0) as f64
            })
            .collect()
    };
    let series = vec![
        (schema::MALE.to_string(), MALE_COLOR, series_for(schema::MALE)),
        (schema::FEMALE.to_string(), FEMALE_COLOR, series_for(schema::FEMALE)),
    ];
    plot::grouped_bars(
        ui,
        "dept_gender",
        "Employee count in each department segmented by gender",
        &depts,
        &series,
        "",
    );

    ui.separator();
    ui.strong("Department Stats");
    dept_stats_table(ui, &stats::dept_stats(rows));

    ui.separator();
    let mut mgr = labelled(&stats::group_mean(rows, schema::DEPARTMENT, schema::YEARS_WITH_CURR_MANAGER));
    mgr.sort_by(|a, b| b.1.total_cmp(&a.1));
    plot::category_bars(
        ui,
        "dept_curr_mgr",
        "Avg number of years with current manager",
        &mgr,
        category_colors(mgr.len(), departments),
        " yrs",
        true,
    );
}

fn dept_stats_table(ui: &mut Ui, rows: &[stats::DeptStats]) {
    const HEADERS: [&str; 7] = [
        "Department",
        "MonthlyIncome",
        "PercentSalaryHike",
        "TotalWorkingYears",
        "YearsAtCompany",
        "TrainingTimesLastYear",
        "OverTime",
    ];
    ui.push_id("dept_stats", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(90.0), HEADERS.len())
            .header(20.0, |mut header| {
                for h in HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|mut body| {
                for d in rows {
                    body.row(18.0, |mut row| {
                        let cells = [
                            d.department.clone(),
                            format!("{:.2}", d.monthly_income),
                            format!("{:.2}", d.percent_salary_hike),
                            format!("{:.2}", d.total_working_years),
                            format!("{:.2}", d.years_at_company),
                            format!("{:.2}", d.training_times_last_year),
                            d.overtime.to_string(),
                        ];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}

fn experience_plots(ui: &mut Ui, rows: &Rows) {
    let mut dist: Vec<(String, f64)> = stats::work_experience_distribution(rows)
        .into_iter()
        .map(|(label, pct)| (label.to_string(), pct))
        .collect();
    dist.sort_by(|a, b| b.1.total_cmp(&a.1));

    let points: Vec<[f64; 2]> = rows
        .iter()
        .filter_map(|r| {
            Some([
                r.number(schema::TOTAL_WORKING_YEARS)?,
                r.number(schema::YEARS_AT_COMPANY)?,
            ])
        })
        .collect();

    ui.columns(2, |cols| {
        plot::category_bars(
            &mut cols[0],
            "work_exp",
            "Employees by total work experience",
            &dist,
            category_colors(dist.len(), None),
            "%",
            true,
        );
        plot::scatter(
            &mut cols[1],
            "cmp_work_exp",
            "Total experience vs years at company",
            points,
            "TotalWorkingYears",
            "YearsAtCompany",
            YES_COLOR,
        );
        cols[1].strong("Employee % by yrs work for company [in %]");
        for (label, share) in stats::pct_at_company(rows) {
            cols[1].monospace(format!("{label:<16}: {share:.2}%"));
        }
    });
}
