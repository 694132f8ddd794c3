use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use sleepscope::config::AppConfig;
use sleepscope::data::loader::Source;
use sleepscope::pipeline::{Dashboard, InitialState, Input};
use sleepscope::scale::NormalizedRange;
use sleepscope::view::ViewMode;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Dataset URL or local .csv/.json path (overrides config)
    #[arg(long)]
    pub source: Option<String>,

    /// Path to config TOML
    #[arg(long, default_value = "sleepscope.toml")]
    pub config: PathBuf,

    /// Print the dashboard state as JSON instead of opening a window
    #[arg(long, default_value_t = false)]
    pub nogui: bool,

    /// Comma-separated categories to select (with --nogui)
    #[arg(long, value_delimiter = ',')]
    pub categories: Option<Vec<String>>,

    /// Normalized slider range in [0, 1] (with --nogui)
    #[arg(long, num_args = 2, value_names = ["LO", "HI"])]
    pub range: Option<Vec<f64>>,

    /// Active tab (with --nogui)
    #[arg(long, value_enum)]
    pub tab: Option<TabArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    Table,
    Chart,
}

impl From<TabArg> for ViewMode {
    fn from(t: TabArg) -> Self {
        match t {
            TabArg::Table => ViewMode::Table,
            TabArg::Chart => ViewMode::Chart,
        }
    }
}

impl Args {
    /// The interactions requested on the command line, in graph input order.
    pub fn inputs(&self) -> Vec<Input> {
        let mut inputs = Vec::new();
        if let Some(cats) = &self.categories {
            let selected: BTreeSet<String> = cats
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            inputs.push(Input::Categories(selected));
        }
        if let Some([lo, hi]) = self.range.as_deref() {
            inputs.push(Input::Range(NormalizedRange::new(*lo, *hi)));
        }
        if let Some(tab) = self.tab {
            inputs.push(Input::Tab(tab.into()));
        }
        inputs
    }
}

#[derive(Serialize)]
struct HeadlessReport<'a> {
    warnings: &'a [String],
    #[serde(flatten)]
    state: InitialState,
}

/// Load the dataset, apply the requested inputs and print the result.
pub fn run_headless(args: &Args, config: &AppConfig) -> Result<()> {
    let source = Source::parse(&config.source.url);
    let dashboard = Dashboard::initialize(&source, config)
        .with_context(|| format!("initializing dashboard from {source}"))?;
    let (mut session, _) = dashboard.open_session();
    session.apply(args.inputs());

    let report = HeadlessReport {
        warnings: dashboard.warnings(),
        state: dashboard.snapshot(&session),
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report).context("writing report")?;
    writeln!(out).context("writing report")?;
    Ok(())
}
