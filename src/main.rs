mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::SessionAnalyzerApp;
use clap::Parser;
use eframe::egui;
use session_analyzer::config::AnalyzerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "session-analyzer",
    version,
    about = "Descriptive statistics viewer for recorded service sessions"
)]
struct Args {
    /// CSV file to open on startup
    data: Option<PathBuf>,
    /// JSON file overriding view parameters
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();

    let args = Args::parse();
    let config = match AnalyzerConfig::load_or_default(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Falling back to default config: {e:#}");
            AnalyzerConfig::default()
        }
    };

    let mut app = SessionAnalyzerApp::new(config);
    if let Some(path) = args.data {
        app.state.open_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Session Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn help_is_not_taken_as_a_data_path() {
        let err = Args::try_parse_from(["session-analyzer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(Args::try_parse_from(["session-analyzer", "--confg", "c.json"]).is_err());
    }

    #[test]
    fn data_and_config_are_both_optional() {
        let args = Args::try_parse_from(["session-analyzer"]).unwrap();
        assert!(args.data.is_none() && args.config.is_none());

        let args =
            Args::try_parse_from(["session-analyzer", "s.csv", "--config", "c.json"]).unwrap();
        assert_eq!(args.data, Some(PathBuf::from("s.csv")));
        assert_eq!(args.config, Some(PathBuf::from("c.json")));
    }
}
