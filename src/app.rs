use eframe::egui;

use session_analyzer::config::AnalyzerConfig;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SessionAnalyzerApp {
    pub state: AppState,
}

impl SessionAnalyzerApp {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for SessionAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: views ----
        egui::SidePanel::left("view_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(report) = self.state.report.clone() else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Select a CSV file to start  (File → Open…)");
                });
                return;
            };
            match self.state.active_tab {
                Tab::TopValues => plot::top_values(ui, &report, &self.state.config),
                Tab::EntriesOverTime => plot::entries_over_time(ui, &report),
                Tab::ServiceTable => table::service_table(ui, &mut self.state),
                Tab::QualityHistogram => plot::quality_histogram(ui, &report),
                Tab::Interactions => plot::interactions(ui, &report),
                Tab::Grades => plot::grades(ui, &report),
            }
        });
    }
}
