use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};
use sleepscope::config::AppConfig;
use sleepscope::view::{DisplayArtifact, ViewMode};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SleepscopeApp {
    pub state: AppState,
}

impl SleepscopeApp {
    /// Build the app and load the configured dataset before the first frame.
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config);
        state.load_configured();
        Self { state }
    }
}

impl eframe::App for SleepscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
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

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.state.session else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to explore it  (File → Open…)");
                });
                return;
            };

            let active = session.tab();
            let mut clicked = None;
            ui.horizontal(|ui| {
                for mode in [ViewMode::Table, ViewMode::Chart] {
                    if ui.selectable_label(active == mode, mode.label()).clicked() {
                        clicked = Some(mode);
                    }
                }
            });
            ui.separator();
            if let Some(mode) = clicked.filter(|m| *m != active) {
                self.state.set_tab(mode);
            }

            let Some(session) = &self.state.session else {
                return;
            };
            match session.artifact() {
                DisplayArtifact::Table(t) => table::data_table(ui, t),
                DisplayArtifact::Chart(spec) => plot::scatter_plot(ui, spec),
                DisplayArtifact::Empty => {}
            }
        });
    }
}
