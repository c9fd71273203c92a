use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Selection;
use crate::state::AppState;
use crate::ui::charts::thousands;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.outcome().dataset.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the widgets.
    let options = state.options.clone();
    let criteria = state.criteria.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Origin country ----
            ui.strong("Origin country");
            if let Some(choice) = selection_combo(
                ui,
                "country_filter",
                &criteria.country,
                options.countries.iter(),
            ) {
                state.set_country(choice);
            }
            ui.add_space(4.0);

            // ---- Origin city (options follow the country) ----
            ui.strong("Origin city");
            if let Some(choice) =
                selection_combo(ui, "city_filter", &criteria.city, state.options.cities.iter())
            {
                state.set_city(choice);
            }
            ui.separator();

            // ---- Pickup month ----
            let header = format!(
                "Pickup month  ({}/{})",
                criteria.months.len(),
                options.months.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("month_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_months();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_months();
                        }
                    });
                    for month in &options.months {
                        let mut checked = state.criteria.months.contains(month);
                        if ui.checkbox(&mut checked, month.to_string()).changed() {
                            state.toggle_month(month);
                        }
                    }
                });

            // ---- Pickup hour ----
            let header = format!(
                "Pickup hour  ({}/{})",
                criteria.hours.len(),
                options.hours.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("hour_filter")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_hours();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_hours();
                        }
                    });
                    for &hour in &options.hours {
                        let mut checked = state.criteria.hours.contains(&hour);
                        if ui.checkbox(&mut checked, format!("{hour:02}:00")).changed() {
                            state.toggle_hour(hour);
                        }
                    }
                });
        });
}

/// Combo box with an "All" entry; returns the new selection when it changed.
fn selection_combo<'a>(
    ui: &mut Ui,
    id: &str,
    current: &Selection,
    values: impl Iterator<Item = &'a String>,
) -> Option<Selection> {
    let mut choice = None;
    let selected_text = current.as_value().unwrap_or("All").to_string();
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_all(), "All").clicked() && !current.is_all() {
                choice = Some(Selection::All);
            }
            for value in values {
                let is_current = current.as_value() == Some(value.as_str());
                if ui.selectable_label(is_current, value.as_str()).clicked() && !is_current {
                    choice = Some(Selection::Only(value.clone()));
                }
            }
        });
    choice
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
        });

        ui.separator();

        let total = state.outcome().dataset.len();
        if total > 0 {
            ui.label(
                RichText::new(format!(
                    "{} of {} trips filtered",
                    thousands(state.filtered_count as u64),
                    thousands(total as u64)
                ))
                .color(Color32::from_rgb(46, 160, 67)),
            );
        }

        if let Some(path) = state.source() {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open trip data")
        .add_filter("Supported files", &["csv", "txt", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(path);
    }
}
