use eframe::egui;

use crate::color::ChartColors;
use crate::state::AppState;
use crate::ui::{charts, map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TripExplorerApp {
    pub state: AppState,
    colors: ChartColors,
}

impl TripExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            colors: ChartColors::default(),
        }
    }
}

impl eframe::App for TripExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
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

        // ---- Central panel: charts and maps ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    charts::dashboard(ui, &self.state, &self.colors);
                    map::maps(ui, &self.state, &self.colors);
                });
        });
    }
}
