use std::collections::BTreeSet;

use sleepscope::config::AppConfig;
use sleepscope::data::loader::Source;
use sleepscope::pipeline::{BoundsOutcome, Dashboard, Session};
use sleepscope::scale::NormalizedRange;
use sleepscope::view::ViewMode;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Shared dataset and its metadata (None until a load succeeds).
    pub dashboard: Option<Dashboard>,

    /// This window's filter session.
    pub session: Option<Session>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dashboard: None,
            session: None,
            status_message: None,
        }
    }

    /// Load a dataset and open a fresh session on it.
    pub fn load(&mut self, source: &Source) {
        match Dashboard::initialize(source, &self.config) {
            Ok(dashboard) => {
                let (session, initial) = dashboard.open_session();
                log::info!(
                    "Dashboard ready: {} rows, {} visible, columns {:?}",
                    initial.summary.rows,
                    session.view().len(),
                    initial.summary.columns
                );
                self.status_message = (!dashboard.warnings().is_empty())
                    .then(|| dashboard.warnings().join("; "));
                self.dashboard = Some(dashboard);
                self.session = Some(session);
            }
            Err(e) => {
                log::error!("Failed to load {source}: {:#}", anyhow::Error::from(e));
                self.status_message = Some(format!("Error loading {source}"));
            }
        }
    }

    /// Reload from the configured URL.
    pub fn load_configured(&mut self) {
        let source = Source::parse(&self.config.source.url);
        self.load(&source);
    }

    pub fn selected(&self) -> BTreeSet<String> {
        self.session
            .as_ref()
            .map(|s| s.state().selected.clone())
            .unwrap_or_default()
    }

    /// Replace the category selection.
    pub fn set_selection(&mut self, selected: BTreeSet<String>) {
        if let Some(session) = &mut self.session {
            if let BoundsOutcome::Unchanged { reason, .. } =
                session.on_category_selection_change(selected)
            {
                log::debug!("range control disabled: {reason}");
            }
        }
    }

    /// Toggle a single category in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        let mut selected = self.selected();
        if !selected.remove(category) {
            selected.insert(category.to_string());
        }
        self.set_selection(selected);
    }

    /// Select every category.
    pub fn select_all(&mut self) {
        if let Some(ds) = self.dashboard.as_ref().map(|d| d.dataset().clone()) {
            self.set_selection(ds.categories().iter().cloned().collect());
        }
    }

    /// Deselect every category.
    pub fn select_none(&mut self) {
        self.set_selection(BTreeSet::new());
    }

    pub fn set_range(&mut self, lo: f64, hi: f64) {
        if let Some(session) = &mut self.session {
            session.on_range_change(NormalizedRange::new(lo, hi));
        }
    }

    pub fn set_tab(&mut self, tab: ViewMode) {
        if let Some(session) = &mut self.session {
            session.on_tab_change(tab);
        }
    }
}
