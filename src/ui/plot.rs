use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{AgeAggregate, GenderDistribution};
use crate::data::model::Dataset;

const UNKNOWN_OCCUPATION: &str = "Unknown";

const CHART_HEIGHT: f32 = 320.0;

/// Marker radius range for the stress-level size encoding.
const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 8.0;

// ---------------------------------------------------------------------------
// Sleep duration vs physical activity
// ---------------------------------------------------------------------------

/// Scatter of physical activity (x) against sleep duration (y), coloured by
/// occupation and sized by stress level.
pub fn activity_scatter(ui: &mut Ui, filtered: &Dataset, colors: Option<&ColorMap>) {
    let stress = filtered.iter().filter_map(|r| r.stress_level);
    let (lo, hi) = stress.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let radius = |stress: Option<f64>| -> f32 {
        match stress {
            Some(s) if hi > lo => {
                MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * ((s - lo) / (hi - lo)) as f32
            }
            _ => (MIN_RADIUS + MAX_RADIUS) / 2.0,
        }
    };

    ui.strong("Sleep Duration vs Physical Activity");
    Plot::new("activity_scatter")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Physical Activity")
        .y_axis_label("Sleep Duration (hrs)")
        .label_formatter(|name, value| scatter_hover_text(filtered, name, value))
        .show(ui, |plot_ui| {
            for r in filtered.iter() {
                let (Some(activity), Some(sleep)) = (r.physical_activity, r.sleep_duration) else {
                    continue;
                };
                let color = colors
                    .map(|cm| cm.color_for(r.occupation.as_deref()))
                    .unwrap_or(Color32::LIGHT_BLUE);
                // Points sharing a name share one legend entry.
                let name = r.occupation.as_deref().unwrap_or(UNKNOWN_OCCUPATION);
                plot_ui.points(
                    Points::new(vec![[activity, sleep]])
                        .name(name)
                        .color(color)
                        .filled(true)
                        .radius(radius(r.stress_level)),
                );
            }
        });
}

/// Tooltip for the scatter: the hovered point's occupation and coordinates,
/// plus age and gender of every record drawn at that spot.
fn scatter_hover_text(filtered: &Dataset, name: &str, value: &PlotPoint) -> String {
    let mut text = format!("Activity: {}\nSleep: {:.1} hrs", value.x, value.y);
    if name.is_empty() {
        return text;
    }
    text = format!("{name}\n{text}");
    let hits = filtered.iter().filter(|r| {
        r.occupation.as_deref().unwrap_or(UNKNOWN_OCCUPATION) == name
            && r.physical_activity == Some(value.x)
            && r.sleep_duration == Some(value.y)
    });
    for r in hits {
        let age = r.age.map_or_else(|| "n/a".to_string(), |a| a.to_string());
        let gender = r.gender.as_deref().unwrap_or("n/a");
        text.push_str(&format!("\nAge: {age}, Gender: {gender}"));
    }
    text
}

// ---------------------------------------------------------------------------
// Sleep duration by gender
// ---------------------------------------------------------------------------

/// One box per gender, placed at x = 0, 1, 2, …
pub fn sleep_by_gender(ui: &mut Ui, boxes: &[GenderDistribution], colors: Option<&ColorMap>) {
    ui.strong("Sleep Duration by Gender");
    Plot::new("sleep_by_gender")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Gender")
        .y_axis_label("Sleep Duration (hrs)")
        .show(ui, |plot_ui| {
            for (i, g) in boxes.iter().enumerate() {
                let x = i as f64;
                let color = colors
                    .map(|cm| cm.color_for(Some(g.gender.as_str())))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let spread = BoxSpread::new(
                    g.lower_whisker,
                    g.q1,
                    g.median,
                    g.q3,
                    g.upper_whisker,
                );
                let elem = BoxElem::new(x, spread)
                    .name(format!("{} (n={})", g.gender, g.count))
                    .box_width(0.5)
                    .whisker_width(0.25)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&g.gender).color(color));

                if !g.outliers.is_empty() {
                    let pts: PlotPoints = g.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(pts).name(&g.gender).color(color).radius(3.0));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Average sleep by age
// ---------------------------------------------------------------------------

/// Line with markers through the per-age means.
pub fn sleep_by_age(ui: &mut Ui, groups: &[AgeAggregate]) {
    let series: Vec<[f64; 2]> = groups
        .iter()
        .map(|g| [g.age as f64, g.mean_sleep_duration])
        .collect();

    ui.strong("Average Sleep Duration by Age");
    Plot::new("sleep_by_age")
        .height(CHART_HEIGHT)
        .x_axis_label("Age")
        .y_axis_label("Avg Sleep Duration (hrs)")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .name("Avg sleep")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series))
                    .name("Avg sleep")
                    .color(Color32::LIGHT_BLUE)
                    .filled(true)
                    .radius(3.5),
            );
        });
}
