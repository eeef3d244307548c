use serde::{Deserialize, Serialize};

use super::error::AnalysisError;
use super::stats;
use crate::data::model::Dataset;

/// Fraction of the data range added on each side of a histogram's x-axis.
const DISPLAY_PADDING_FRACTION: f64 = 0.1;
/// Padding used instead when every value is identical.
const MIN_DISPLAY_PADDING: f64 = 0.05;

/// An inclusive numeric bound applied before any statistic is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampRange {
    pub min: f64,
    pub max: f64,
}

impl ClampRange {
    pub fn new(min: f64, max: f64) -> Self {
        ClampRange { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Summary statistics of the valid values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Statistics over a non-empty slice.
    pub fn of(values: &[f64]) -> Option<Self> {
        let (min, max) = stats::min_max(values)?;
        Some(Summary {
            count: values.len(),
            mean: stats::mean(values)?,
            median: stats::median(values)?,
            std_dev: stats::sample_std_dev(values),
            min,
            max,
        })
    }
}

/// Equal-width histogram plus summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    /// `counts.len() + 1` ascending edges.
    pub bin_edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub summary: Summary,
    /// Explicit bounds the values were clamped to, if any.
    pub range: Option<ClampRange>,
}

impl Histogram {
    /// x-axis extent for drawing. A clamped histogram shows exactly its
    /// range; otherwise the data range is padded on both sides.
    pub fn display_range(&self) -> (f64, f64) {
        if let Some(r) = self.range {
            return (r.min, r.max);
        }
        let (lo, hi) = (self.summary.min, self.summary.max);
        let mut padding = (hi - lo) * DISPLAY_PADDING_FRACTION;
        if padding == 0.0 {
            padding = MIN_DISPLAY_PADDING;
        }
        (lo - padding, hi + padding)
    }

    pub fn bin_width(&self) -> f64 {
        match self.bin_edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    /// `(left edge, width, count)` per bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.bin_edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1] - w[0], c))
    }
}

/// Bin `values` into `bins` equal-width bins over `[lo, hi]`.
///
/// The last bin is closed on the right; values outside the range are not
/// counted. A zero-width range is widened by half a unit on each side.
pub fn bin_values(values: &[f64], bins: usize, lo: f64, hi: f64) -> (Vec<f64>, Vec<usize>) {
    let bins = bins.max(1);
    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / bins as f64;

    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let mut counts = vec![0usize; bins];
    for &v in values {
        if v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        // Guard against float error putting a value on the wrong side of an edge.
        let idx = if v < edges[idx] {
            idx.saturating_sub(1)
        } else if idx + 1 < bins && v >= edges[idx + 1] {
            idx + 1
        } else {
            idx
        };
        counts[idx] += 1;
    }
    (edges, counts)
}

/// Histogram and summary of a numeric column.
///
/// Cells that do not parse as numbers are dropped. With `range`, values
/// outside it are dropped too and the bins span exactly the range;
/// otherwise they span the data's own minimum and maximum.
pub fn compute_histogram(
    dataset: &Dataset,
    column: &str,
    bins: usize,
    range: Option<ClampRange>,
) -> Result<Histogram, AnalysisError> {
    if dataset.column_index(column).is_none() {
        return Err(AnalysisError::missing_column(column, &dataset.column_names));
    }
    let values: Vec<f64> = super::numeric_cells(dataset, column)
        .into_iter()
        .flatten()
        .collect();
    histogram_of(column, &values, bins, range)
}

/// [`compute_histogram`] over values already extracted from a column.
pub fn histogram_of(
    column: &str,
    values: &[f64],
    bins: usize,
    range: Option<ClampRange>,
) -> Result<Histogram, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::NoValidData {
            column: column.to_string(),
        });
    }

    let kept: Vec<f64> = match range {
        Some(r) => values.iter().copied().filter(|&v| r.contains(v)).collect(),
        None => values.to_vec(),
    };
    let Some(summary) = Summary::of(&kept) else {
        let r = range.unwrap_or(ClampRange::new(f64::NAN, f64::NAN));
        return Err(AnalysisError::NoDataInRange {
            column: column.to_string(),
            min: r.min,
            max: r.max,
        });
    };

    let (lo, hi) = match range {
        Some(r) => (r.min, r.max),
        None => (summary.min, summary.max),
    };
    let (bin_edges, counts) = bin_values(&kept, bins, lo, hi);

    log::debug!(
        "histogram of '{column}': {} values in {} bins over [{lo}, {hi}]",
        kept.len(),
        counts.len()
    );

    Ok(Histogram {
        column: column.to_string(),
        bin_edges,
        counts,
        summary,
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn scores(values: &[&str]) -> Dataset {
        Dataset::from_rows(
            vec!["qualite_score".into()],
            values.iter().map(|v| vec![CellValue::from_raw(v)]).collect(),
        )
    }

    #[test]
    fn counts_cover_every_valid_value() {
        let ds = scores(&["0.15", "0.55", "0.95", "abc", "", "0.55", "1.0", "0.0"]);
        let h = compute_histogram(&ds, "qualite_score", 10, None).unwrap();
        assert_eq!(h.counts.iter().sum::<usize>(), 6);
        assert_eq!(h.summary.count, 6);
        assert_eq!(h.bin_edges.len(), 11);
        assert_eq!(h.bin_edges[0], 0.0);
        assert_eq!(h.bin_edges[10], 1.0);
        assert_eq!(h.counts[0], 1);
        // Maximum lands in the closed last bin.
        assert_eq!(h.counts[9], 2);
    }

    #[test]
    fn summary_uses_sample_standard_deviation() {
        let ds = scores(&["1", "2", "3", "4"]);
        let s = compute_histogram(&ds, "qualite_score", 4, None).unwrap().summary;
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.median, 2.5);
        assert!((s.std_dev.unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!((s.min, s.max), (1.0, 4.0));
    }

    #[test]
    fn clamp_drops_out_of_range_values() {
        let ds = scores(&["-1", "0", "2.5", "5", "7", "4.9"]);
        let h = compute_histogram(&ds, "qualite_score", 10, Some(ClampRange::new(0.0, 5.0))).unwrap();
        assert_eq!(h.counts.iter().sum::<usize>(), 4);
        assert_eq!(h.bin_edges[0], 0.0);
        assert_eq!(h.bin_edges[10], 5.0);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[5], 1);
        assert_eq!(h.counts[9], 2);
        assert_eq!(h.display_range(), (0.0, 5.0));
    }

    #[test]
    fn empty_states_are_distinct() {
        let ds = scores(&["x", ""]);
        assert!(matches!(
            compute_histogram(&ds, "qualite_score", 10, None),
            Err(AnalysisError::NoValidData { .. })
        ));

        let ds = scores(&["8", "9"]);
        assert!(matches!(
            compute_histogram(&ds, "qualite_score", 10, Some(ClampRange::new(0.0, 5.0))),
            Err(AnalysisError::NoDataInRange { .. })
        ));

        assert!(matches!(
            compute_histogram(&ds, "note", 10, None),
            Err(AnalysisError::MissingColumn { .. })
        ));
    }

    #[test]
    fn identical_values_still_bin_and_pad_for_display() {
        let ds = scores(&["0.7", "0.7", "0.7"]);
        let h = compute_histogram(&ds, "qualite_score", 10, None).unwrap();
        assert_eq!(h.counts.iter().sum::<usize>(), 3);
        let (lo, hi) = h.display_range();
        assert!((lo - 0.65).abs() < 1e-12);
        assert!((hi - 0.75).abs() < 1e-12);
    }

    #[test]
    fn display_range_pads_ten_percent() {
        let ds = scores(&["0", "10"]);
        let h = compute_histogram(&ds, "qualite_score", 5, None).unwrap();
        assert_eq!(h.display_range(), (-1.0, 11.0));
        assert_eq!(h.bin_width(), 2.0);
        assert_eq!(h.bars().count(), 5);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn cell() -> impl Strategy<Value = String> {
            prop_oneof![
                3 => (-1e3..1e3f64).prop_map(|v| v.to_string()),
                2 => (-1000i64..1000).prop_map(|v| v.to_string()),
                1 => Just(String::new()),
                1 => "[a-z]{1,4}",
            ]
        }

        fn clamp() -> impl Strategy<Value = Option<ClampRange>> {
            proptest::option::of(
                (-1e3..1e3f64, 0.0..1e3f64).prop_map(|(lo, w)| ClampRange::new(lo, lo + w)),
            )
        }

        proptest! {
            #[test]
            fn counts_cover_every_valid_value_in_range(
                cells in prop::collection::vec(cell(), 0..80),
                bins in 1usize..=50,
                range in clamp(),
            ) {
                let raw: Vec<&str> = cells.iter().map(String::as_str).collect();
                let ds = scores(&raw);
                let valid: Vec<f64> = raw
                    .iter()
                    .filter_map(|s| CellValue::from_raw(s).as_f64())
                    .collect();
                let in_range = valid
                    .iter()
                    .filter(|&&v| range.map_or(true, |r| r.contains(v)))
                    .count();

                let result = compute_histogram(&ds, "qualite_score", bins, range);
                match &result {
                    Ok(h) => {
                        prop_assert_eq!(h.counts.iter().sum::<usize>(), in_range);
                        prop_assert_eq!(h.summary.count, in_range);
                        prop_assert_eq!(h.counts.len(), bins);
                        prop_assert_eq!(h.bin_edges.len(), bins + 1);
                        prop_assert!(h.bin_edges.windows(2).all(|w| w[0] <= w[1]));
                    }
                    Err(AnalysisError::NoValidData { .. }) => prop_assert!(valid.is_empty()),
                    Err(AnalysisError::NoDataInRange { .. }) => {
                        prop_assert!(!valid.is_empty());
                        prop_assert_eq!(in_range, 0);
                    }
                    Err(other) => prop_assert!(false, "unexpected {:?}", other),
                }
                prop_assert_eq!(&result, &compute_histogram(&ds, "qualite_score", bins, range));
            }
        }
    }
}
