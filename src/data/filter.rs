use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{CellValue, Dataset, Row};
use crate::error::DomainError;
use crate::scale::{NormalizedRange, NumericDomain};

// ---------------------------------------------------------------------------
// Filter state: which categories are selected, which slider range is set
// ---------------------------------------------------------------------------

/// The per-session user input driving the filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Selected categories. Empty means nothing passes.
    pub selected: BTreeSet<String>,
    pub range: NormalizedRange,
}

/// Rows of a dataset that passed a filter, as indices in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The selected rows of `dataset`, in dataset order.
    pub fn rows<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Row> + 'a {
        self.indices.iter().map(move |&i| &dataset.rows()[i])
    }

    /// Data-frame "split" orientation of the selected rows. The index holds
    /// source row labels, so rows dropped at load leave gaps.
    pub fn to_split(&self, dataset: &Dataset) -> SplitFrame {
        SplitFrame {
            columns: dataset.columns().to_vec(),
            index: self.rows(dataset).map(|r| r.source_row).collect(),
            data: self.rows(dataset).map(|r| r.cells.clone()).collect(),
        }
    }
}

/// `{"columns": [...], "index": [...], "data": [[...], ...]}`: the
/// serialized form of a [`FilteredView`] handed to the display shell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitFrame {
    pub columns: Vec<String>,
    pub index: Vec<usize>,
    pub data: Vec<Vec<CellValue>>,
}

impl SplitFrame {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows whose category is selected and whose size lies in the decoded range.
///
/// The range is decoded against the dataset's *global* domain, never the
/// per-selection bounds. Rows with a null size never pass.
pub fn filter(
    dataset: &Dataset,
    selected: &BTreeSet<String>,
    range: NormalizedRange,
) -> Result<FilteredView, DomainError> {
    if selected.is_empty() {
        return Ok(FilteredView::default());
    }
    let bounds = range.decode(&dataset.numeric_domain()?)?;

    let indices = dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            selected.contains(&row.category) && row.size.is_some_and(|v| bounds.contains(v))
        })
        .map(|(i, _)| i)
        .collect();
    Ok(FilteredView { indices })
}

/// `[min, max]` of the size field over the rows of the selected categories.
///
/// Fails with [`DomainError::Empty`] when none of those rows has a size;
/// callers keep their previous bounds in that case.
pub fn bounds_for(
    dataset: &Dataset,
    selected: &BTreeSet<String>,
) -> Result<NumericDomain, DomainError> {
    let values = dataset
        .rows()
        .iter()
        .filter(|r| selected.contains(&r.category))
        .filter_map(|r| r.size);
    NumericDomain::from_values(values).ok_or_else(|| DomainError::Empty {
        column: dataset.fields().size.clone(),
        scope: format!("selection {selected:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PaletteKind;
    use crate::data::model::tests::scenario;
    use crate::data::model::FieldNames;
    use proptest::prelude::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scenario_herbi_full_range() {
        let ds = scenario();
        let view = filter(&ds, &set(&["herbi"]), NormalizedRange::FULL).unwrap();
        let rows: Vec<_> = view.rows(&ds).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "herbi");
        assert_eq!(rows[0].size, Some(1.0));
        assert_eq!(rows[0].duration, Some(5.0));
    }

    #[test]
    fn test_scenario_bounds_carni() {
        let ds = scenario();
        assert_eq!(
            bounds_for(&ds, &set(&["carni"])).unwrap(),
            NumericDomain::new(100.0, 100.0)
        );
    }

    #[test]
    fn test_empty_selection_is_empty() {
        let ds = scenario();
        let view = filter(&ds, &BTreeSet::new(), NormalizedRange::FULL).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_narrow_range_excludes_ends() {
        let ds = scenario();
        let all = set(&["carni", "herbi"]);
        // decode(0.25) = 100^0.25 ≈ 3.16, decode(0.75) ≈ 31.6
        let view = filter(&ds, &all, NormalizedRange::new(0.25, 0.75)).unwrap();
        assert!(view.is_empty());
        let view = filter(&ds, &all, NormalizedRange::new(0.5, 1.0)).unwrap();
        assert_eq!(view.indices(), [1]);
    }

    #[test]
    fn test_bounds_empty_when_only_null_sizes() {
        let columns = vec!["vore".to_string(), "bodywt".to_string(), "sleep_total".to_string()];
        let table = vec![
            vec![CellValue::String("insecti".into()), CellValue::Null, CellValue::Float(19.7)],
            vec![CellValue::String("omni".into()), CellValue::Float(2.0), CellValue::Float(8.0)],
        ];
        let ds = Dataset::from_table(columns, table, FieldNames::default(), PaletteKind::G10)
            .unwrap();
        assert!(matches!(
            bounds_for(&ds, &set(&["insecti"])),
            Err(DomainError::Empty { .. })
        ));
        assert!(matches!(bounds_for(&ds, &BTreeSet::new()), Err(DomainError::Empty { .. })));
    }

    #[test]
    fn test_invalid_global_domain_fails_filter() {
        let columns = vec!["vore".to_string(), "bodywt".to_string(), "sleep_total".to_string()];
        let table = vec![vec![
            CellValue::String("omni".into()),
            CellValue::Integer(0),
            CellValue::Float(8.0),
        ]];
        let ds = Dataset::from_table(columns, table, FieldNames::default(), PaletteKind::G10)
            .unwrap();
        let err = filter(&ds, &set(&["omni"]), NormalizedRange::FULL).unwrap_err();
        assert_eq!(err, DomainError::Invalid { min: 0.0 });
    }

    #[test]
    fn test_split_frame_json() {
        let ds = scenario();
        let view = filter(&ds, &set(&["carni", "herbi"]), NormalizedRange::FULL).unwrap();
        let json = view.to_split(&ds).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"columns":["name","vore","bodywt","sleep_total"],"index":[0,1],"data":[["a","herbi",1,5],["b","carni",100,2]]}"#
        );
    }

    #[test]
    fn test_split_index_keeps_source_labels() {
        let columns = vec!["vore".to_string(), "bodywt".to_string(), "sleep_total".to_string()];
        let row = |vore: CellValue, w: f64| vec![vore, CellValue::Float(w), CellValue::Float(8.0)];
        let table = vec![
            row(CellValue::Null, 2.0),
            row(CellValue::String("herbi".into()), 1.0),
            row(CellValue::String("herbi".into()), 3.0),
        ];
        let ds = Dataset::from_table(columns, table, FieldNames::default(), PaletteKind::G10)
            .unwrap();
        let view = filter(&ds, &set(&["herbi"]), NormalizedRange::FULL).unwrap();
        assert_eq!(view.indices(), [0, 1]);
        assert_eq!(view.to_split(&ds).index, [1, 2]);
    }

    // Random datasets over a small category alphabet with occasional null sizes.
    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        let row = (0usize..4, prop::option::weighted(0.8, 0.01f64..1e4), 0.0f64..24.0);
        prop::collection::vec(row, 1..40).prop_map(|rows| {
            let columns = vec!["vore".to_string(), "bodywt".to_string(), "sleep_total".to_string()];
            let table = rows
                .into_iter()
                .map(|(c, size, dur)| {
                    vec![
                        CellValue::String(["carni", "herbi", "insecti", "omni"][c].to_string()),
                        size.map_or(CellValue::Null, CellValue::Float),
                        CellValue::Float(dur),
                    ]
                })
                .collect();
            Dataset::from_table(columns, table, FieldNames::default(), PaletteKind::G10).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_empty_selection_empty(ds in arb_dataset(), a in 0.0f64..1.0, b in 0.0f64..1.0) {
            prop_assume!(ds.numeric_domain().is_ok());
            let view = filter(&ds, &BTreeSet::new(), NormalizedRange::new(a, b)).unwrap();
            prop_assert!(view.is_empty());
        }

        #[test]
        fn prop_full_selection_full_range(ds in arb_dataset()) {
            prop_assume!(ds.numeric_domain().is_ok());
            let all: BTreeSet<String> = ds.categories().iter().cloned().collect();
            let view = filter(&ds, &all, NormalizedRange::FULL).unwrap();
            let expected: Vec<usize> = ds
                .rows()
                .iter()
                .enumerate()
                .filter(|(_, r)| r.size.is_some())
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(view.indices(), expected.as_slice());
        }

        #[test]
        fn prop_bounds_monotonic(ds in arb_dataset(), mask in 0u8..16, extra in 0u8..16) {
            let cats = ["carni", "herbi", "insecti", "omni"];
            let pick = |m: u8| -> BTreeSet<String> {
                cats.iter()
                    .enumerate()
                    .filter(|(i, _)| m & (1 << i) != 0)
                    .map(|(_, c)| c.to_string())
                    .collect()
            };
            let small = pick(mask);
            let large = pick(mask | extra);
            if let Ok(inner) = bounds_for(&ds, &small) {
                let outer = bounds_for(&ds, &large).unwrap();
                prop_assert!(outer.covers(&inner));
            }
        }

        #[test]
        fn prop_view_preserves_order(ds in arb_dataset(), a in 0.0f64..1.0, b in 0.0f64..1.0) {
            prop_assume!(ds.numeric_domain().is_ok());
            let all: BTreeSet<String> = ds.categories().iter().cloned().collect();
            let view = filter(&ds, &all, NormalizedRange::new(a, b)).unwrap();
            prop_assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        }
    }
}
