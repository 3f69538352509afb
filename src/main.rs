use midilog::{Config, DEFAULT_CONFIG_FILE, MidiLogApp, Session};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %path.display(), "{}", e);
            std::process::exit(1);
        }
    };
    info!(?config, "starting midilog");

    let session = match Session::new(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 300.0])
            .with_title("MIDI Log"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "midilog",
        options,
        Box::new(move |_cc| Ok(Box::new(MidiLogApp::new(&config, session)))),
    ) {
        error!("{}", e);
    }
}
