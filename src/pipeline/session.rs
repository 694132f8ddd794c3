use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use super::graph::{DependencyGraph, Node};
use crate::data::filter::{bounds_for, filter, FilterState, FilteredView, SplitFrame};
use crate::data::model::Dataset;
use crate::error::DomainError;
use crate::scale::{slider_labels, NormalizedRange, NumericDomain, SliderMark};
use crate::view::{render, DisplayArtifact, ViewMode};

// ---------------------------------------------------------------------------
// Inputs & outputs
// ---------------------------------------------------------------------------

/// One user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Categories(BTreeSet<String>),
    Range(NormalizedRange),
    Tab(ViewMode),
}

impl Input {
    fn node(&self) -> Node {
        match self {
            Input::Categories(_) => Node::Categories,
            Input::Range(_) => Node::Range,
            Input::Tab(_) => Node::Tab,
        }
    }
}

/// Displayed bounds and tick marks of the range control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderScale {
    pub domain: NumericDomain,
    pub marks: Vec<SliderMark>,
    /// False while the current selection has no numeric rows.
    pub enabled: bool,
}

impl SliderScale {
    pub fn for_domain(domain: NumericDomain, steps: usize) -> Self {
        let marks = slider_labels(&domain, steps).unwrap_or_else(|e| {
            log::warn!("No slider marks for {domain:?}: {e}");
            Vec::new()
        });
        Self {
            domain,
            marks,
            enabled: true,
        }
    }
}

/// Result of recomputing the per-selection bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundsOutcome {
    Rescaled(NumericDomain),
    /// The selection has no numeric rows; the previous bounds stay and the
    /// control is disabled.
    Unchanged {
        kept: NumericDomain,
        reason: DomainError,
    },
}

/// Which derived values one [`Session::apply`] pass recomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recomputed {
    pub bounds: Option<BoundsOutcome>,
    pub filtered: bool,
    pub artifact: bool,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Filter state and derived values of one UI session. The dataset is shared
/// read-only; everything else is owned by the session.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    graph: DependencyGraph,
    marks: usize,
    state: FilterState,
    tab: ViewMode,
    scale: SliderScale,
    view: FilteredView,
    filter_error: Option<DomainError>,
    artifact: DisplayArtifact,
}

impl Session {
    /// Build a session and compute every derived value once.
    pub fn new(
        dataset: Arc<Dataset>,
        state: FilterState,
        tab: ViewMode,
        initial_scale: SliderScale,
        marks: usize,
    ) -> Self {
        let mut session = Self {
            dataset,
            graph: DependencyGraph::new(),
            marks,
            state,
            tab,
            scale: initial_scale,
            view: FilteredView::default(),
            filter_error: None,
            artifact: DisplayArtifact::Empty,
        };
        session.recompute(&[Node::Categories, Node::Range, Node::Tab]);
        session
    }

    /// Apply inputs, then recompute the dependent values in topological
    /// order.
    pub fn apply(&mut self, inputs: impl IntoIterator<Item = Input>) -> Recomputed {
        let mut changed = Vec::new();
        for input in inputs {
            changed.push(input.node());
            match input {
                Input::Categories(selected) => self.state.selected = selected,
                Input::Range(range) => self.state.range = range,
                Input::Tab(tab) => self.tab = tab,
            }
        }
        self.recompute(&changed)
    }

    fn recompute(&mut self, changed: &[Node]) -> Recomputed {
        let mut out = Recomputed::default();
        for node in self.graph.dirty(changed) {
            log::debug!("recomputing {node:?}");
            match node {
                Node::Bounds => out.bounds = Some(self.recompute_bounds()),
                Node::Filtered => {
                    self.recompute_filtered();
                    out.filtered = true;
                }
                Node::Artifact => {
                    self.artifact = render(&self.dataset, &self.view, self.tab);
                    out.artifact = true;
                }
                Node::Categories | Node::Range | Node::Tab => {}
            }
        }
        out
    }

    fn recompute_bounds(&mut self) -> BoundsOutcome {
        match bounds_for(&self.dataset, &self.state.selected) {
            Ok(domain) => {
                self.scale = SliderScale::for_domain(domain, self.marks);
                BoundsOutcome::Rescaled(domain)
            }
            Err(reason) => {
                log::debug!("keeping slider bounds: {reason}");
                self.scale.enabled = false;
                BoundsOutcome::Unchanged {
                    kept: self.scale.domain,
                    reason,
                }
            }
        }
    }

    fn recompute_filtered(&mut self) {
        match filter(&self.dataset, &self.state.selected, self.state.range) {
            Ok(view) => {
                self.view = view;
                self.filter_error = None;
            }
            Err(e) => {
                log::warn!("filter failed: {e}");
                self.view = FilteredView::default();
                self.filter_error = Some(e);
            }
        }
    }

    // -- the shell-facing operations --

    /// Switch tabs and render the newly active one from the current view.
    pub fn on_tab_change(&mut self, tab: ViewMode) -> DisplayArtifact {
        self.apply([Input::Tab(tab)]);
        self.artifact.clone()
    }

    /// Set both filter inputs and return the filtered view in split form.
    pub fn on_filter_change(
        &mut self,
        selected: BTreeSet<String>,
        range: NormalizedRange,
    ) -> Result<SplitFrame, DomainError> {
        self.apply([Input::Categories(selected), Input::Range(range)]);
        match &self.filter_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.view.to_split(&self.dataset)),
        }
    }

    /// Update the category selection and report the rescaled bounds.
    pub fn on_category_selection_change(&mut self, selected: BTreeSet<String>) -> BoundsOutcome {
        let recomputed = self.apply([Input::Categories(selected)]);
        recomputed.bounds.unwrap_or(BoundsOutcome::Rescaled(self.scale.domain))
    }

    pub fn on_range_change(&mut self, range: NormalizedRange) -> Recomputed {
        self.apply([Input::Range(range)])
    }

    // -- accessors --

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn tab(&self) -> ViewMode {
        self.tab
    }

    pub fn scale(&self) -> &SliderScale {
        &self.scale
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn filter_error(&self) -> Option<&DomainError> {
        self.filter_error.as_ref()
    }

    pub fn artifact(&self) -> &DisplayArtifact {
        &self.artifact
    }

    /// Decoded `(lo, hi)` actually applied by the filter.
    pub fn applied_bounds(&self) -> Result<NumericDomain, DomainError> {
        self.state.range.decode(&self.dataset.numeric_domain()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::scenario;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn session(selected: &[&str]) -> Session {
        let ds = Arc::new(scenario());
        let global = ds.numeric_domain().unwrap();
        let state = FilterState {
            selected: set(selected),
            range: NormalizedRange::FULL,
        };
        Session::new(ds, state, ViewMode::Table, SliderScale::for_domain(global, 10), 10)
    }

    #[test]
    fn test_new_session_is_fully_computed() {
        let s = session(&["herbi"]);
        assert_eq!(s.view().indices(), [0]);
        assert_eq!(s.scale().domain, NumericDomain::new(1.0, 1.0));
        assert!(matches!(s.artifact(), DisplayArtifact::Table(t) if t.records.len() == 1));
    }

    #[test]
    fn test_tab_change_renders_only_active() {
        let mut s = session(&["herbi", "carni"]);
        let artifact = s.on_tab_change(ViewMode::Chart);
        assert!(matches!(artifact, DisplayArtifact::Chart(ref c) if c.traces.len() == 2));
        assert_eq!(s.view().len(), 2);
    }

    #[test]
    fn test_category_change_rescales() {
        let mut s = session(&["herbi"]);
        let outcome = s.on_category_selection_change(set(&["carni", "herbi"]));
        assert_eq!(outcome, BoundsOutcome::Rescaled(NumericDomain::new(1.0, 100.0)));
        assert_eq!(s.view().indices(), [0, 1]);
        assert!(s.scale().enabled);
    }

    #[test]
    fn test_empty_selection_keeps_bounds_and_disables() {
        let mut s = session(&["carni"]);
        let outcome = s.on_category_selection_change(BTreeSet::new());
        assert!(matches!(
            outcome,
            BoundsOutcome::Unchanged { kept, .. } if kept == NumericDomain::new(100.0, 100.0)
        ));
        assert!(!s.scale().enabled);
        assert!(s.view().is_empty());

        s.on_category_selection_change(set(&["herbi"]));
        assert!(s.scale().enabled);
    }

    #[test]
    fn test_filter_change_decodes_against_global_domain() {
        let mut s = session(&["carni"]);
        // Selection bounds are [100, 100] but the decode uses [1, 100].
        let frame = s.on_filter_change(set(&["carni"]), NormalizedRange::new(0.5, 1.0)).unwrap();
        assert_eq!(frame.index, [1]);
        assert!((s.applied_bounds().unwrap().min - 10.0).abs() < 1e-9);
        let frame = s.on_filter_change(set(&["carni"]), NormalizedRange::new(0.0, 0.5)).unwrap();
        assert!(frame.data.is_empty());
    }

    #[test]
    fn test_range_change_does_not_touch_bounds() {
        let mut s = session(&["herbi", "carni"]);
        let r = s.on_range_change(NormalizedRange::new(0.1, 0.2));
        assert_eq!(r.bounds, None);
        assert!(r.filtered && r.artifact);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let ds = Arc::new(scenario());
        let global = ds.numeric_domain().unwrap();
        let make = |sel: &[&str]| {
            let state = FilterState {
                selected: set(sel),
                range: NormalizedRange::FULL,
            };
            Session::new(ds.clone(), state, ViewMode::Table, SliderScale::for_domain(global, 4), 4)
        };
        let mut a = make(&["herbi"]);
        let b = make(&["herbi"]);
        a.on_filter_change(set(&["carni"]), NormalizedRange::FULL).unwrap();
        a.on_tab_change(ViewMode::Chart);
        assert_eq!(b.state().selected, set(&["herbi"]));
        assert_eq!(b.tab(), ViewMode::Table);
        assert_eq!(b.view().indices(), [0]);
        assert!(Arc::ptr_eq(a.dataset(), b.dataset()));
    }
}
