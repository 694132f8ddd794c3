use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::color::{ColorMap, PaletteKind, Rgb8};
use crate::error::{DomainError, LoadError};
use crate::scale::NumericDomain;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common data-frame dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Float(_) | CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`. Strings and bools are not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the dataset
// ---------------------------------------------------------------------------

/// One dataset record. `cells` follows [`Dataset::columns`]; the three
/// fields the pipeline works with are extracted once at load.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Position of the record in the source table, counting rows dropped
    /// at load.
    pub source_row: usize,
    pub cells: Vec<CellValue>,
    pub category: String,
    pub size: Option<f64>,
    pub duration: Option<f64>,
}

/// Names of the columns the pipeline interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub category: String,
    pub size: String,
    pub duration: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            category: "vore".to_string(),
            size: "bodywt".to_string(),
            duration: "sleep_total".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table with its derived metadata. Immutable once built; share
/// it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
    fields: FieldNames,
    /// Distinct categories, sorted ascending.
    categories: Vec<String>,
    color_map: ColorMap,
    dropped: usize,
}

impl Dataset {
    /// Build a dataset from raw table cells.
    ///
    /// Rows whose category cell is null are dropped. A size or duration cell
    /// that is not numeric is treated as null.
    pub fn from_table(
        columns: Vec<String>,
        table: Vec<Vec<CellValue>>,
        fields: FieldNames,
        palette: PaletteKind,
    ) -> Result<Self, LoadError> {
        let index_of = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };
        let cat_idx = index_of(&fields.category)?;
        let size_idx = index_of(&fields.size)?;
        let dur_idx = index_of(&fields.duration)?;

        let total = table.len();
        let mut rows = Vec::with_capacity(total);
        for (row_no, mut cells) in table.into_iter().enumerate() {
            if cells.len() > columns.len() {
                return Err(LoadError::RaggedRow {
                    row: row_no,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }
            cells.resize(columns.len(), CellValue::Null);
            let category = match &cells[cat_idx] {
                CellValue::Null => {
                    log::debug!("row {row_no}: no '{}', dropped", fields.category);
                    continue;
                }
                other => other.to_string(),
            };
            let size = cells[size_idx].as_f64();
            let duration = cells[dur_idx].as_f64();
            rows.push(Row {
                source_row: row_no,
                cells,
                category,
                size,
                duration,
            });
        }
        let dropped = total - rows.len();

        let categories: Vec<String> = rows
            .iter()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let color_map = ColorMap::new(&categories, palette);

        Ok(Dataset {
            columns,
            rows,
            fields,
            categories,
            color_map,
            dropped,
        })
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    /// Distinct category values, sorted ascending.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Stable display colour of a category.
    pub fn color_of(&self, category: &str) -> Rgb8 {
        self.color_map.color_for(category)
    }

    /// Number of rows removed at load for lacking a category.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Global `[min, max]` of the size field, ignoring nulls.
    pub fn numeric_domain(&self) -> Result<NumericDomain, DomainError> {
        NumericDomain::from_values(self.rows.iter().filter_map(|r| r.size)).ok_or_else(|| {
            DomainError::Empty {
                column: self.fields.size.clone(),
                scope: "the dataset".to_string(),
            }
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    /// The three-row dataset used throughout the pipeline tests.
    pub(crate) fn scenario() -> Dataset {
        let columns = vec!["name".into(), "vore".into(), "bodywt".into(), "sleep_total".into()];
        let table = vec![
            vec![s("a"), s("herbi"), CellValue::Integer(1), CellValue::Integer(5)],
            vec![s("b"), s("carni"), CellValue::Integer(100), CellValue::Integer(2)],
            vec![s("c"), s("herbi"), CellValue::Null, CellValue::Integer(3)],
        ];
        Dataset::from_table(columns, table, FieldNames::default(), PaletteKind::G10).unwrap()
    }

    #[test]
    fn test_rows_without_category_are_dropped() {
        let columns = vec!["vore".into(), "bodywt".into(), "sleep_total".into()];
        let table = vec![
            vec![s("omni"), CellValue::Float(0.5), CellValue::Float(9.1)],
            vec![CellValue::Null, CellValue::Float(2.0), CellValue::Float(4.0)],
        ];
        let ds = Dataset::from_table(columns, table, FieldNames::default(), PaletteKind::G10)
            .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped(), 1);
        assert!(ds.rows().iter().all(|r| !r.category.is_empty()));
    }

    #[test]
    fn test_missing_required_column() {
        let columns = vec!["vore".into(), "bodywt".into()];
        let err = Dataset::from_table(columns, vec![], FieldNames::default(), PaletteKind::G10)
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "sleep_total"));
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        let ds = scenario();
        assert_eq!(ds.categories(), ["carni", "herbi"]);
    }

    #[test]
    fn test_global_domain_ignores_nulls() {
        let ds = scenario();
        assert_eq!(ds.numeric_domain().unwrap(), NumericDomain::new(1.0, 100.0));
    }

    #[test]
    fn test_all_null_domain_is_empty() {
        let columns = vec!["vore".into(), "bodywt".into(), "sleep_total".into()];
        let table = vec![vec![s("omni"), CellValue::Null, CellValue::Float(9.1)]];
        let ds = Dataset::from_table(columns, table, FieldNames::default(), PaletteKind::G10)
            .unwrap();
        assert!(matches!(ds.numeric_domain(), Err(DomainError::Empty { .. })));
    }

    #[test]
    fn test_non_numeric_size_is_null() {
        let columns = vec!["vore".into(), "bodywt".into(), "sleep_total".into()];
        let table = vec![vec![s("omni"), s("heavy"), CellValue::Integer(3)]];
        let ds = Dataset::from_table(columns, table, FieldNames::default(), PaletteKind::G10)
            .unwrap();
        assert_eq!(ds.rows()[0].size, None);
        assert_eq!(ds.rows()[0].duration, Some(3.0));
    }

    #[test]
    fn test_cell_serialization() {
        let cells = vec![
            s("x"),
            CellValue::Integer(2),
            CellValue::Float(f64::NAN),
            CellValue::Null,
        ];
        assert_eq!(serde_json::to_string(&cells).unwrap(), r#"["x",2,null,null]"#);
    }
}
