use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::{ChartColors, Series};
use crate::metrics::{CategoryCount, HistogramBin, Kpis};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Central panel – KPIs, distributions, histograms
// ---------------------------------------------------------------------------

/// Render every chart for the current snapshot.
pub fn dashboard(ui: &mut Ui, state: &AppState, colors: &ChartColors) {
    if state.outcome().dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No trips loaded  (File → Open…)");
        });
        return;
    }

    let snap = &state.snapshot;

    ui.heading("Key indicators");
    kpi_row(ui, &snap.kpis);
    ui.separator();

    ui.heading("Countries and cities");
    ui.columns(2, |cols: &mut [Ui]| {
        bar_chart(
            &mut cols[0],
            "Origin countries",
            &snap.origin_countries,
            colors.color_for(Series::OriginCountries),
        );
        bar_chart(
            &mut cols[1],
            "Destination countries",
            &snap.destination_countries,
            colors.color_for(Series::DestinationCountries),
        );
    });
    ui.columns(2, |cols: &mut [Ui]| {
        let n = state.settings.top_n;
        bar_chart(
            &mut cols[0],
            &format!("Top {n} origin cities"),
            &snap.top_origin_cities,
            colors.color_for(Series::OriginCities),
        );
        count_table(&mut cols[0], "origin_city_table", "City", &snap.top_origin_cities);
        bar_chart(
            &mut cols[1],
            &format!("Top {n} destination cities"),
            &snap.top_destination_cities,
            colors.color_for(Series::DestinationCities),
        );
        count_table(
            &mut cols[1],
            "destination_city_table",
            "City",
            &snap.top_destination_cities,
        );
    });
    ui.separator();

    ui.heading("Airport traffic");
    ui.columns(2, |cols: &mut [Ui]| {
        bar_chart(
            &mut cols[0],
            "Origin airports",
            &snap.origin_airports,
            colors.color_for(Series::OriginAirports),
        );
        bar_chart(
            &mut cols[1],
            "Destination airports",
            &snap.destination_airports,
            colors.color_for(Series::DestinationAirports),
        );
    });
    ui.separator();

    ui.heading("Time and passengers");
    ui.columns(2, |cols: &mut [Ui]| {
        histogram_chart(
            &mut cols[0],
            "Trips by hour of day",
            &snap.hour_histogram,
            colors.color_for(Series::Hours),
        );
        histogram_chart(
            &mut cols[1],
            "Trips by day of week",
            &snap.weekday_histogram,
            colors.color_for(Series::Weekdays),
        );
    });
    histogram_chart(
        ui,
        "Passengers per trip",
        &snap.passenger_histogram,
        colors.color_for(Series::Passengers),
    );
}

/// The four headline figures side by side.
pub fn kpi_row(ui: &mut Ui, kpis: &Kpis) {
    ui.columns(4, |cols: &mut [Ui]| {
        kpi(
            &mut cols[0],
            "Total distance (km)",
            thousands(kpis.total_distance_km.round() as u64),
        );
        kpi(&mut cols[1], "Trips", thousands(kpis.trip_count as u64));
        kpi(&mut cols[2], "Trips from an airport", thousands(kpis.from_airport as u64));
        kpi(&mut cols[3], "Trips to an airport", thousands(kpis.to_airport as u64));
    });
}

fn kpi(ui: &mut Ui, caption: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.label(RichText::new(caption).weak());
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Bars in the given order, one per category, labelled on the x axis.
pub fn bar_chart(ui: &mut Ui, title: &str, counts: &[CategoryCount], color: Color32) {
    let points: Vec<(String, usize)> = counts
        .iter()
        .map(|c| (c.category.clone(), c.count))
        .collect();
    labelled_bars(ui, title, points, color);
}

/// Histogram buckets, empty ones included.
pub fn histogram_chart(ui: &mut Ui, title: &str, bins: &[HistogramBin], color: Color32) {
    let points: Vec<(String, usize)> = bins.iter().map(|b| (b.bucket.label(), b.count)).collect();
    labelled_bars(ui, title, points, color);
}

fn labelled_bars(ui: &mut Ui, title: &str, points: Vec<(String, usize)>, color: Color32) {
    ui.strong(title);
    if points.is_empty() {
        ui.label(RichText::new("No data").weak());
        return;
    }

    let bars: Vec<Bar> = points
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new(i as f64, *count as f64)
                .name(label)
                .width(0.8)
                .fill(color)
        })
        .collect();

    let labels: Vec<String> = points.into_iter().map(|(label, _)| label).collect();
    Plot::new(title)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_label("Count")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Two-column table of a frequency list.
pub fn count_table(ui: &mut Ui, id: &str, heading: &str, counts: &[CategoryCount]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::remainder())
            .column(Column::auto().at_least(60.0))
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong(heading);
                });
                header.col(|ui: &mut Ui| {
                    ui.strong("Trips");
                });
            })
            .body(|mut body| {
                for row_data in counts {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(row_data.category.as_str());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(thousands(row_data.count as u64));
                        });
                    });
                }
            });
    });
    ui.add_space(8.0);
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
