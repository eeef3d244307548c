use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value inferred from the delimited text.
/// Used as a key in `BTreeSet` / `HashMap` downstream so it must be `Ord + Hash`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --
// Numbers compare by value: `Integer(4) == Float(4.0)` and `-0.0 == 0.0`.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => unsigned_zero(*a).total_cmp(&unsigned_zero(*b)),
            (Integer(a), Float(b)) => match integral(*b) {
                Some(b) => a.cmp(&b),
                None => (*a as f64).total_cmp(b),
            },
            (Float(_), Integer(_)) => other.cmp(self).reverse(),
            (Text(a), Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn unsigned_zero(f: f64) -> f64 {
    if f == 0.0 {
        0.0
    } else {
        f
    }
}

/// The float as an `i64` when it holds a whole number in range.
fn integral(f: f64) -> Option<i64> {
    // 2^63 itself is out of range for i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)).then(|| f as i64)
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            CellValue::Integer(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            CellValue::Float(f) => {
                2u8.hash(state);
                match integral(*f) {
                    Some(i) => i.hash(state),
                    None => f.to_bits().hash(state),
                }
            }
            CellValue::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            CellValue::Null => 0u8.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Infer the type of a raw text cell.
    pub fn from_raw(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return CellValue::number(f);
            }
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::Text(s.to_string())
    }

    /// A number in canonical form: whole values become `Integer`, so
    /// `"4"` and `"4.0"` (or `"-0.0"` and `"0"`) load as the same cell.
    pub fn number(f: f64) -> Self {
        match integral(f) {
            Some(i) => CellValue::Integer(i),
            None => CellValue::Float(f),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric coercion: numbers pass through, text is parsed, anything that
    /// does not yield a finite number is treated as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Whether the cell counts as numeric when deciding a column's sort order.
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

static NULL_CELL: CellValue = CellValue::Null;

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column indices.
///
/// Rows are stored positionally, aligned with `column_names`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Column names in header order.
    pub column_names: Vec<String>,
    /// All rows; `rows[r][c]` is the cell of column `column_names[c]`.
    pub rows: Vec<Vec<CellValue>>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build column indices from the loaded rows.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = column_names
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();

        for row in &rows {
            for (col, val) in column_names.iter().zip(row) {
                if let Some(set) = unique_values.get_mut(col) {
                    set.insert(val.clone());
                }
            }
        }
        Dataset {
            column_names,
            rows,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of an exact column name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Iterate over one column's cells, or `None` if the column is absent.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or(&NULL_CELL)))
    }

    /// A cell by row and column position.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL_CELL)
    }

    /// A column is numeric-typed when it has at least one value and every
    /// non-missing value is a number.
    pub fn is_numeric_column(&self, name: &str) -> bool {
        self.unique_values.get(name).is_some_and(|vals| {
            let mut present = vals.iter().filter(|v| !v.is_null()).peekable();
            present.peek().is_some() && present.all(CellValue::is_numeric)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_rows(
            vec!["service".into(), "score".into()],
            vec![
                vec![CellValue::from_raw("cardio"), CellValue::from_raw("3")],
                vec![CellValue::from_raw("neuro"), CellValue::from_raw("2.5")],
                vec![CellValue::from_raw("cardio"), CellValue::from_raw("")],
            ],
        )
    }

    #[test]
    fn infers_cell_types() {
        assert_eq!(CellValue::from_raw(""), CellValue::Null);
        assert_eq!(CellValue::from_raw("42"), CellValue::Integer(42));
        assert_eq!(CellValue::from_raw("4.5"), CellValue::Float(4.5));
        assert_eq!(CellValue::from_raw("true"), CellValue::Bool(true));
        assert_eq!(CellValue::from_raw("nan"), CellValue::Text("nan".into()));
        assert_eq!(CellValue::from_raw("abc"), CellValue::Text("abc".into()));
    }

    #[test]
    fn numeric_coercion_parses_text_and_rejects_garbage() {
        assert_eq!(CellValue::Text(" 3.25 ".into()).as_f64(), Some(3.25));
        assert_eq!(CellValue::Text("n/a".into()).as_f64(), None);
        assert_eq!(CellValue::Text("inf".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
        assert_eq!(CellValue::Integer(7).as_f64(), Some(7.0));
    }

    #[test]
    fn mixed_numbers_order_numerically() {
        let mut vals = vec![
            CellValue::Float(2.5),
            CellValue::Integer(3),
            CellValue::Integer(1),
        ];
        vals.sort();
        assert_eq!(
            vals,
            vec![CellValue::Integer(1), CellValue::Float(2.5), CellValue::Integer(3)]
        );
    }

    #[test]
    fn whole_floats_load_as_integers() {
        assert_eq!(CellValue::from_raw("4.0"), CellValue::Integer(4));
        assert_eq!(CellValue::from_raw("-0.0"), CellValue::Integer(0));
        assert_eq!(CellValue::from_raw("4.0").to_string(), "4");
        assert_eq!(CellValue::from_raw("1e3"), CellValue::Integer(1000));
        assert_eq!(CellValue::from_raw("1e300"), CellValue::Float(1e300));
    }

    #[test]
    fn equal_numbers_hash_alike() {
        use std::collections::HashSet;
        let set: HashSet<CellValue> = [
            CellValue::Integer(4),
            CellValue::Float(4.0),
            CellValue::Float(-0.0),
            CellValue::Float(0.0),
            CellValue::Integer(0),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(CellValue::Float(-0.0).cmp(&CellValue::Float(0.0)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn column_access_and_typing() {
        let ds = sample();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column_index("score"), Some(1));
        assert!(ds.column("missing").is_none());
        let services: Vec<String> = ds
            .column("service")
            .map(|c| c.map(|v| v.to_string()).collect())
            .unwrap_or_default();
        assert_eq!(services, vec!["cardio", "neuro", "cardio"]);
        assert!(ds.is_numeric_column("score"));
        assert!(!ds.is_numeric_column("service"));
        assert_eq!(ds.unique_values["service"].len(), 2);
    }
}
