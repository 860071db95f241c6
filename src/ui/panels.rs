use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::export_csv;
use crate::data::summary::format_stat;
use crate::state::{AppState, ChartTab};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Occupation selector ----
    ui.strong("Select Occupation");
    let current = state.selected_occupation.clone();
    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("occupation")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for (i, option) in state.occupation_options.iter().enumerate() {
                let mut text = RichText::new(option);
                // Entry 0 is the "All" sentinel and has no colour.
                if i > 0 {
                    if let Some(cm) = &state.occupation_colors {
                        text = text.color(cm.color_for(Some(option.as_str())));
                    }
                }
                if ui.selectable_label(current == *option, text).clicked() {
                    picked = Some(option.clone());
                }
            }
        });
    if let Some(occupation) = picked {
        state.select_occupation(&occupation);
    }
    ui.add_space(8.0);

    // ---- Minimum sleep slider ----
    ui.strong("Minimum Sleep Duration (hrs)");
    match state.sleep_bounds {
        Some((lo, hi)) => {
            let mut hours = state.min_sleep;
            if ui.add(egui::Slider::new(&mut hours, lo..=hi)).changed() {
                state.set_min_sleep(hours);
            }
        }
        None => {
            ui.label("No sleep durations in this dataset.");
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel – title, summary, charts, raw data
// ---------------------------------------------------------------------------

/// Render the dashboard body for the latest pipeline run.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sleep Health & Lifestyle Dashboard");
    ui.label("Use the sidebar to filter by occupation and minimum sleep duration.");
    ui.separator();

    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let msg = state
                .status_message
                .as_deref()
                .unwrap_or("Open a file to view sleep data  (File → Open…)");
            ui.heading(msg);
        });
        return;
    };

    let dashboard = match &view.body {
        Ok(d) => d,
        Err(e) => {
            let msg = format!("{}. Try adjusting them.", capitalize(&e.to_string()));
            ui.label(RichText::new(msg).strong());
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Summary statistics ----
            let s = &dashboard.summary;
            ui.heading("Summary Statistics");
            ui.label(format!(
                "• Average Sleep Duration: {} hrs",
                format_stat(s.mean_sleep_duration)
            ));
            ui.label(format!("• Average Stress Level: {}", format_stat(s.mean_stress_level)));
            ui.label(format!(
                "• Average Physical Activity: {}",
                format_stat(s.mean_physical_activity)
            ));
            ui.add_space(8.0);

            // ---- Chart tabs ----
            ui.horizontal(|ui: &mut Ui| {
                ui.selectable_value(&mut state.chart_tab, ChartTab::Scatter, "Scatter Plot");
                ui.selectable_value(
                    &mut state.chart_tab,
                    ChartTab::AgeAndGender,
                    "Sleep by Age & Gender",
                );
            });
            ui.separator();

            match state.chart_tab {
                ChartTab::Scatter => {
                    plot::activity_scatter(ui, &view.filtered, state.occupation_colors.as_ref());
                }
                ChartTab::AgeAndGender => {
                    plot::sleep_by_gender(ui, &dashboard.by_gender, state.gender_colors.as_ref());
                    ui.add_space(8.0);
                    plot::sleep_by_age(ui, &dashboard.by_age);
                }
            }
            ui.add_space(8.0);

            // ---- Raw data ----
            egui::CollapsingHeader::new(RichText::new("View Full Dataset").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    table::filtered_table(ui, &view.filtered);
                });
        });
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state
                .view
                .as_ref()
                .is_some_and(|v| !v.filtered.is_empty());
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} records loaded, {} match",
                view.total_rows,
                view.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sleep data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let Some(view) = &state.view else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_sleep_data.csv")
        .save_file();

    if let Some(path) = file {
        match export_csv(&view.filtered, &path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
