use std::cmp::Ordering;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Row filter: equality on one column, or the "All" sentinel
// ---------------------------------------------------------------------------

/// Label of the sentinel entry that disables filtering.
pub const ALL_LABEL: &str = "All";

/// Selection made in the table view's filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowFilter {
    /// No filtering: every row passes.
    #[default]
    All,
    /// Keep rows whose cell equals this value.
    Equals(CellValue),
}

impl RowFilter {
    pub fn label(&self) -> String {
        match self {
            RowFilter::All => ALL_LABEL.to_string(),
            RowFilter::Equals(v) => v.to_string(),
        }
    }
}

/// Dropdown entries for a filter column: `All`, then the sorted distinct
/// non-missing values.
pub fn filter_options(dataset: &Dataset, column: &str) -> Vec<RowFilter> {
    let mut options = vec![RowFilter::All];
    if let Some(values) = dataset.unique_values.get(column) {
        options.extend(
            values
                .iter()
                .filter(|v| !v.is_null())
                .cloned()
                .map(RowFilter::Equals),
        );
    }
    options
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// A subset / reordering of the dataset's rows, held as row indices.
/// Never mutates the dataset it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableView {
    pub indices: Vec<usize>,
}

impl TableView {
    /// Every row, in source order.
    pub fn all(dataset: &Dataset) -> Self {
        TableView {
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the rows that pass `filter` on `column`.
///
/// * `RowFilter::All` → every row
/// * the column is absent → no row can equal the value, so the view is empty
pub fn filter_rows(dataset: &Dataset, column: &str, filter: &RowFilter) -> TableView {
    let wanted = match filter {
        RowFilter::All => return TableView::all(dataset),
        RowFilter::Equals(v) => v,
    };
    let Some(col) = dataset.column_index(column) else {
        return TableView::default();
    };
    let indices = (0..dataset.len())
        .filter(|&row| dataset.cell(row, col) == wanted)
        .collect();
    TableView { indices }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Which column the table is sorted by and in which direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<String>,
    pub ascending: bool,
}

impl SortState {
    /// Register a header click: the same column flips direction, a new column
    /// starts ascending.  Returns the direction to sort with.
    pub fn request(&mut self, column: &str) -> bool {
        if self.column.as_deref() == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column.to_string());
            self.ascending = true;
        }
        self.ascending
    }
}

/// Stable sort of `view` by `column`: numeric order if the column is
/// numeric-typed, lexical order of the displayed text otherwise.
/// Missing cells sort last in either direction.
pub fn sort_view(dataset: &Dataset, view: &TableView, column: &str, ascending: bool) -> TableView {
    let Some(col) = dataset.column_index(column) else {
        return view.clone();
    };
    let numeric = dataset.is_numeric_column(column);

    let mut indices = view.indices.clone();
    indices.sort_by(|&a, &b| {
        let (va, vb) = (dataset.cell(a, col), dataset.cell(b, col));
        match (va.is_null(), vb.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = if numeric {
                    va.cmp(vb)
                } else {
                    va.to_string().cmp(&vb.to_string())
                };
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    });
    TableView { indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let raw = [
            ["cardio", "10", "b"],
            ["neuro", "2", "a"],
            ["cardio", "", "c"],
            ["pedia", "2", "a"],
        ];
        Dataset::from_rows(
            vec!["service".into(), "duree".into(), "code".into()],
            raw.iter()
                .map(|r| r.iter().map(|s| CellValue::from_raw(s)).collect())
                .collect(),
        )
    }

    #[test]
    fn equal_numbers_share_one_option() {
        let ds = Dataset::from_rows(
            vec!["grade".into()],
            ["4", "4.0", "4", "-0.0", "0.0"]
                .iter()
                .map(|s| vec![CellValue::from_raw(s)])
                .collect(),
        );
        let labels: Vec<String> = filter_options(&ds, "grade").iter().map(RowFilter::label).collect();
        assert_eq!(labels, vec!["All", "0", "4"]);

        let four = RowFilter::Equals(CellValue::Integer(4));
        assert_eq!(filter_rows(&ds, "grade", &four).indices, vec![0, 1, 2]);
        let float_four = RowFilter::Equals(CellValue::Float(4.0));
        assert_eq!(filter_rows(&ds, "grade", &float_four).indices, vec![0, 1, 2]);
    }

    #[test]
    fn all_sentinel_keeps_every_row() {
        let ds = dataset();
        let view = filter_rows(&ds, "service", &RowFilter::All);
        assert_eq!(view.indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn equality_filter_selects_matching_rows() {
        let ds = dataset();
        let filter = RowFilter::Equals(CellValue::Text("cardio".into()));
        assert_eq!(filter_rows(&ds, "service", &filter).indices, vec![0, 2]);
        assert!(filter_rows(&ds, "absent", &filter).is_empty());
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn options_start_with_all_and_skip_missing() {
        let ds = dataset();
        let labels: Vec<String> = filter_options(&ds, "duree").iter().map(|f| f.label()).collect();
        assert_eq!(labels, vec!["All", "2", "10"]);
    }

    #[test]
    fn numeric_columns_sort_numerically_with_missing_last() {
        let ds = dataset();
        let view = TableView::all(&ds);
        assert_eq!(sort_view(&ds, &view, "duree", true).indices, vec![1, 3, 0, 2]);
        assert_eq!(sort_view(&ds, &view, "duree", false).indices, vec![0, 1, 3, 2]);
    }

    #[test]
    fn sort_is_stable() {
        let ds = dataset();
        let view = TableView::all(&ds);
        assert_eq!(sort_view(&ds, &view, "code", true).indices, vec![1, 3, 0, 2]);
        let reversed = TableView { indices: vec![3, 2, 1, 0] };
        assert_eq!(sort_view(&ds, &reversed, "code", true).indices, vec![3, 1, 0, 2]);
    }

    #[test]
    fn repeated_requests_toggle_and_new_column_resets() {
        let mut sort = SortState::default();
        assert!(sort.request("duree"));
        assert!(!sort.request("duree"));
        assert!(sort.request("duree"));
        assert!(!sort.request("duree"));
        assert!(sort.request("service"));
        assert_eq!(sort.column.as_deref(), Some("service"));
    }

    #[test]
    fn sorting_does_not_touch_the_dataset() {
        let ds = dataset();
        let before = ds.rows.clone();
        let filtered = filter_rows(&ds, "service", &RowFilter::Equals(CellValue::Text("cardio".into())));
        let _ = sort_view(&ds, &filtered, "duree", false);
        assert_eq!(ds.rows, before);
    }
}
