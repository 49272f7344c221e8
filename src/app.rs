use eframe::egui::{self, RichText, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, summary};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EstateLensApp {
    pub state: AppState,
}

impl EstateLensApp {
    /// Build the app and load the configured dataset before the first frame.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.load_startup();
        Self { state }
    }
}

impl eframe::App for EstateLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Missing input: nothing else is shown ----
        if let Some(err) = &self.state.fatal_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading(RichText::new(err).color(egui::Color32::RED));
                });
            });
            return;
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, recommendations, charts ----
        let mut export = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(insights) = &self.state.insights else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a listings file to begin  (File → Open…)");
                });
                return;
            };

            ui.heading("🏡 Property Market Analytics");
            if insights.is_empty() {
                ui.label("No listings match the current filters.");
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    summary::kpis(ui, insights);
                    ui.separator();
                    export = summary::recommendations(ui, insights);
                    ui.separator();
                    plot::charts(ui, &self.state, insights);
                });
        });

        // Dialogs run after the frame's borrows of the state end.
        if let Some(kind) = export {
            panels::save_export_dialog(&mut self.state, kind);
        }
    }
}
