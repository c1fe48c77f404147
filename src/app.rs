use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BandCompareApp {
    pub state: AppState,
}

impl BandCompareApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for BandCompareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: group selector ----
        egui::SidePanel::left("group_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: band grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::band_grid(ui, &self.state);
        });
    }
}
