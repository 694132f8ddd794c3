//! Turns a filtered view into what the shell displays: a table record set or
//! a categorical scatter specification.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::color::{to_hex, Rgb8};
use crate::data::filter::FilteredView;
use crate::data::model::{CellValue, Dataset};

/// Which tab the shell is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Chart,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Table => "Table",
            ViewMode::Chart => "Graph",
        }
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayArtifact {
    Table(TableArtifact),
    Chart(ScatterSpec),
    /// Produced for the inactive tab.
    Empty,
}

impl DisplayArtifact {
    pub fn is_empty(&self) -> bool {
        matches!(self, DisplayArtifact::Empty)
    }
}

/// All dataset columns, one record per view row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableArtifact {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

/// One table row; serializes as a JSON object with keys in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Scatter plot: x = size, y = duration, one trace per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSpec {
    pub x_label: String,
    pub y_label: String,
    pub color_label: String,
    /// In order of first appearance in the view.
    pub traces: Vec<ScatterTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub category: String,
    #[serde(serialize_with = "serialize_hex")]
    pub color: Rgb8,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Index of the source row in the dataset.
    pub row: usize,
    pub x: f64,
    pub y: f64,
}

fn serialize_hex<S: Serializer>(c: &Rgb8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(*c))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render `view` as `mode`.
pub fn render(dataset: &Dataset, view: &FilteredView, mode: ViewMode) -> DisplayArtifact {
    match mode {
        ViewMode::Table => DisplayArtifact::Table(render_table(dataset, view)),
        ViewMode::Chart => DisplayArtifact::Chart(render_chart(dataset, view)),
    }
}

/// Render `mode` only if it is the active tab; otherwise return
/// [`DisplayArtifact::Empty`] without touching the view.
pub fn render_active(
    dataset: &Dataset,
    view: &FilteredView,
    mode: ViewMode,
    active: ViewMode,
) -> DisplayArtifact {
    if mode != active {
        return DisplayArtifact::Empty;
    }
    render(dataset, view, mode)
}

pub fn render_table(dataset: &Dataset, view: &FilteredView) -> TableArtifact {
    let columns = dataset.columns().to_vec();
    let records = view
        .rows(dataset)
        .map(|row| Record {
            fields: columns.iter().cloned().zip(row.cells.iter().cloned()).collect(),
        })
        .collect();
    TableArtifact { columns, records }
}

/// Rows without a duration have no y coordinate and are left out.
pub fn render_chart(dataset: &Dataset, view: &FilteredView) -> ScatterSpec {
    let mut traces: Vec<ScatterTrace> = Vec::new();
    for (&idx, row) in view.indices().iter().zip(view.rows(dataset)) {
        let (Some(x), Some(y)) = (row.size, row.duration) else {
            continue;
        };
        let point = ScatterPoint { row: idx, x, y };
        match traces.iter_mut().find(|t| t.category == row.category) {
            Some(trace) => trace.points.push(point),
            None => traces.push(ScatterTrace {
                category: row.category.clone(),
                color: dataset.color_of(&row.category),
                points: vec![point],
            }),
        }
    }

    let fields = dataset.fields();
    ScatterSpec {
        x_label: fields.size.clone(),
        y_label: fields.duration.clone(),
        color_label: fields.category.clone(),
        traces,
    }
}
