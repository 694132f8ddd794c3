//! Filter-and-view pipeline: the shared dataset plus per-session state.
//!
//! Architecture:
//! ```text
//!   categories ─┬──────────────► bounds  (slider rescale)
//!               ▼
//!   range ───► filtered ──┐
//!                         ▼
//!   tab ──────────────► artifact (table | chart)
//! ```
//!
//! A [`Dashboard`] owns the dataset, loaded once and shared read-only.
//! Each [`Session`] owns its own filter state and derived values.

pub mod graph;
pub mod session;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

pub use graph::{DependencyGraph, Node};
pub use session::{BoundsOutcome, Input, Recomputed, Session, SliderScale};

use crate::color::to_hex;
use crate::config::AppConfig;
use crate::data::filter::{FilterState, SplitFrame};
use crate::data::loader::{self, Source};
use crate::data::model::Dataset;
use crate::error::Result;
use crate::scale::{NormalizedRange, NumericDomain};
use crate::view::{render_active, DisplayArtifact, ViewMode};

// ---------------------------------------------------------------------------
// Metadata handed to the shell at startup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub value: String,
    pub label: String,
    /// `#RRGGBB`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub dropped: usize,
    pub columns: Vec<String>,
    pub categories: Vec<CategoryInfo>,
    pub domain: NumericDomain,
    pub scale: SliderScale,
}

/// Everything a fresh session shows before the first interaction.
#[derive(Debug, Clone, Serialize)]
pub struct InitialState {
    pub summary: DatasetSummary,
    pub selected: BTreeSet<String>,
    pub range: NormalizedRange,
    pub tab: ViewMode,
    pub filtered: SplitFrame,
    pub table: DisplayArtifact,
    pub chart: DisplayArtifact,
}

/// Per-session defaults taken from the configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub marks: usize,
    pub default_tab: ViewMode,
    pub category_suffix: String,
}

impl From<&AppConfig> for SessionSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            marks: cfg.slider.marks,
            default_tab: cfg.display.default_tab,
            category_suffix: cfg.display.category_suffix.clone(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Process-wide state: the loaded dataset and what is derived from it once.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    summary: DatasetSummary,
    settings: SessionSettings,
    warnings: Vec<String>,
}

impl Dashboard {
    /// Load `source` and prepare the shared state.
    pub fn initialize(source: &Source, config: &AppConfig) -> Result<Self> {
        let dataset = loader::load(source, &config.load_options())?;
        Self::from_dataset(dataset, SessionSettings::from(config))
    }

    /// Fails when the size field has no values at all. A domain that cannot
    /// back the log scale is kept and reported through [`Self::warnings`].
    pub fn from_dataset(dataset: Dataset, settings: SessionSettings) -> Result<Self> {
        let domain = dataset.numeric_domain()?;
        let mut warnings = Vec::new();
        if let Err(e) = domain.check_log_scale() {
            log::warn!("Range filter unavailable: {e}");
            warnings.push(format!("Range filter unavailable: {e}"));
        }

        let categories = dataset
            .categories()
            .iter()
            .map(|c| CategoryInfo {
                value: c.clone(),
                label: format!("{c}{}", settings.category_suffix),
                color: to_hex(dataset.color_of(c)),
            })
            .collect();
        let summary = DatasetSummary {
            rows: dataset.len(),
            dropped: dataset.dropped(),
            columns: dataset.columns().to_vec(),
            categories,
            domain,
            scale: SliderScale::for_domain(domain, settings.marks),
        };

        Ok(Self {
            dataset: Arc::new(dataset),
            summary,
            settings,
            warnings,
        })
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn summary(&self) -> &DatasetSummary {
        &self.summary
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The default filter: first category, full range.
    pub fn default_filter(&self) -> FilterState {
        FilterState {
            selected: self.dataset.categories().iter().take(1).cloned().collect(),
            range: NormalizedRange::FULL,
        }
    }

    /// Start a new session with the default filter and tab.
    pub fn open_session(&self) -> (Session, InitialState) {
        let session = Session::new(
            Arc::clone(&self.dataset),
            self.default_filter(),
            self.settings.default_tab,
            self.summary.scale.clone(),
            self.settings.marks,
        );
        let initial = self.snapshot(&session);
        (session, initial)
    }

    /// Describe `session` the way a fresh page load would see it.
    pub fn snapshot(&self, session: &Session) -> InitialState {
        let ds = &self.dataset;
        let view = session.view();
        let tab = session.tab();
        InitialState {
            summary: self.summary.clone(),
            selected: session.state().selected.clone(),
            range: session.state().range,
            tab,
            filtered: view.to_split(ds),
            table: render_active(ds, view, ViewMode::Table, tab),
            chart: render_active(ds, view, ViewMode::Chart, tab),
        }
    }
}
