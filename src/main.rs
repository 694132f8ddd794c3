mod app;
mod cli;
mod state;
mod ui;

use app::SleepscopeApp;
use clap::Parser;
use eframe::egui;
use sleepscope::config::AppConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    let mut config = AppConfig::load_or_default(&args.config);
    if let Some(source) = &args.source {
        config.source.url = source.clone();
    }

    if args.nogui {
        return cli::run_headless(&args, &config);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sleepscope – Mammal Sleep Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(SleepscopeApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
