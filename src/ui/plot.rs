use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
};

use crate::data::stats::BoxSummary;

const PLOT_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Shared plot setup
// ---------------------------------------------------------------------------

/// A static (no pan / zoom) plot with a legend, the way every dashboard chart
/// is shown.
fn base_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

/// Axis formatter that prints `labels[i]` at integer position `i`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// One bar per category, each its own legend entry.
pub fn category_bars(
    ui: &mut Ui,
    id: &str,
    title: &str,
    items: &[(String, f64)],
    color: impl Fn(usize, &str) -> Color32,
    unit: &str,
    horizontal: bool,
) {
    ui.strong(title);
    let labels: Vec<String> = items.iter().map(|(l, _)| l.clone()).collect();
    let mut plot = base_plot(id);
    plot = if horizontal {
        plot.y_axis_formatter(category_formatter(labels))
    } else {
        plot.x_axis_formatter(category_formatter(labels))
    };

    plot.show(ui, |plot_ui| {
        for (i, (label, value)) in items.iter().enumerate() {
            let bar = Bar::new(i as f64, *value)
                .width(0.7)
                .name(format!("{label}: {value:.1}{unit}"));
            let mut chart = BarChart::new(vec![bar])
                .name(label)
                .color(color(i, label.as_str()));
            if horizontal {
                chart = chart.horizontal();
            }
            plot_ui.bar_chart(chart);
        }
    });
}

/// Side-by-side bars: for each group, one bar per series.
pub fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    title: &str,
    groups: &[String],
    series: &[(String, Color32, Vec<f64>)],
    unit: &str,
) {
    ui.strong(title);
    let n = series.len().max(1) as f64;
    let width = 0.8 / n;

    base_plot(id)
        .x_axis_formatter(category_formatter(groups.to_vec()))
        .show(ui, |plot_ui| {
            for (s, (name, color, values)) in series.iter().enumerate() {
                let offset = (s as f64 - (n - 1.0) / 2.0) * width;
                let bars: Vec<Bar> = values
                    .iter()
                    .enumerate()
                    .map(|(g, v)| {
                        let group = groups.get(g).map(String::as_str).unwrap_or("");
                        Bar::new(g as f64 + offset, *v)
                            .width(width * 0.95)
                            .name(format!("{group} / {name}: {v:.1}{unit}"))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(name).color(*color));
            }
        });
}

/// Histogram of a numeric column, bins keyed by their start value.
pub fn histogram(ui: &mut Ui, id: &str, title: &str, bins: &BTreeMap<i64, usize>, bin_width: f64, color: Color32) {
    ui.strong(title);
    let bars: Vec<Bar> = bins
        .iter()
        .map(|(&start, &count)| {
            Bar::new(start as f64 + bin_width / 2.0, count as f64)
                .width(bin_width)
                .name(format!("{start}-{}: {count}", start as f64 + bin_width))
        })
        .collect();
    base_plot(id).show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name("count").color(color));
    });
}

// ---------------------------------------------------------------------------
// Box plots & scatter
// ---------------------------------------------------------------------------

/// One box per group.
pub fn box_plot(
    ui: &mut Ui,
    id: &str,
    title: &str,
    groups: &[(String, BoxSummary)],
    color: impl Fn(usize, &str) -> Color32,
) {
    ui.strong(title);
    let labels: Vec<String> = groups.iter().map(|(l, _)| l.clone()).collect();
    base_plot(id)
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            for (i, (label, b)) in groups.iter().enumerate() {
                let elem = BoxElem::new(i as f64, BoxSpread::new(b.min, b.q1, b.median, b.q3, b.max))
                    .box_width(0.5)
                    .name(label);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(label).color(color(i, label.as_str())));
            }
        });
}

pub fn scatter(ui: &mut Ui, id: &str, title: &str, points: Vec<[f64; 2]>, x_label: &str, y_label: &str, color: Color32) {
    ui.strong(title);
    base_plot(id)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(3.0)
                    .color(color.gamma_multiply(0.6))
                    .name("employees"),
            );
        });
}
