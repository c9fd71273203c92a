use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Plot, PlotPoints, Points};

use crate::color::{ChartColors, Series};
use crate::data::model::GeoPoint;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Origin / destination point maps
// ---------------------------------------------------------------------------

/// Both sampled point clouds, side by side.
pub fn maps(ui: &mut Ui, state: &AppState, colors: &ChartColors) {
    if state.outcome().dataset.is_empty() {
        return;
    }
    ui.separator();
    ui.heading("Origin and destination maps");
    ui.columns(2, |cols: &mut [Ui]| {
        point_map(
            &mut cols[0],
            "Origin points",
            &state.snapshot.origin_points,
            colors.color_for(Series::OriginPoints),
        );
        point_map(
            &mut cols[1],
            "Destination points",
            &state.snapshot.destination_points,
            colors.color_for(Series::DestinationPoints),
        );
    });
}

/// Scatter of lat/lon pairs, longitude on x. Equal axis scale keeps the
/// geography recognisable at these latitudes.
pub fn point_map(ui: &mut Ui, title: &str, points: &[GeoPoint], color: Color32) {
    ui.strong(format!("{title} ({} shown)", points.len()));
    if points.is_empty() {
        ui.label(RichText::new("No coordinates").weak());
        return;
    }

    let plot_points: PlotPoints = points.iter().map(|p| [p.lon, p.lat]).collect();
    Plot::new(title)
        .height(360.0)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(true)
        .show(ui, |plot_ui| {
            plot_ui.points(Points::new(plot_points).radius(1.5).color(color).name(title));
        });
}
