use serde::Serialize;

use super::distribution::{histogram_of, Histogram};
use super::error::AnalysisError;
use super::stats;
use crate::data::model::Dataset;

/// Whisker reach as a multiple of the interquartile range.
const WHISKER_IQR: f64 = 1.5;

/// Totals and central tendency of two row-aligned numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedStats {
    pub total_a: f64,
    pub total_b: f64,
    pub mean_a: f64,
    pub mean_b: f64,
    pub median_a: f64,
    pub median_b: f64,
    /// Pearson coefficient; `None` when either series has zero variance.
    pub correlation: Option<f64>,
}

/// Five-number box plus outliers, as drawn by a boxplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Quartiles by linear interpolation; whiskers reach the most extreme
    /// values within 1.5 × IQR of the box.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q1 = stats::quantile_sorted(&sorted, 0.25);
        let median = stats::quantile_sorted(&sorted, 0.5);
        let q3 = stats::quantile_sorted(&sorted, 0.75);
        let reach = (q3 - q1) * WHISKER_IQR;
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1)
            .min(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3)
            .max(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// One side of a comparison: the aligned series and its distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedSeries {
    pub column: String,
    /// One value per dataset row; unparseable cells are 0.
    pub values: Vec<f64>,
    pub histogram: Option<Histogram>,
    pub boxplot: Option<BoxSummary>,
}

impl PairedSeries {
    fn build(column: &str, values: Vec<f64>, bins: usize) -> Self {
        PairedSeries {
            column: column.to_string(),
            histogram: histogram_of(column, &values, bins, None).ok(),
            boxplot: BoxSummary::of(&values),
            values,
        }
    }
}

/// Row-by-row comparison of two numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedComparison {
    pub a: PairedSeries,
    pub b: PairedSeries,
    pub stats: PairedStats,
}

/// Compare `column_a` with `column_b` over every row.
///
/// Cells that do not parse become 0 rather than dropping the row, so both
/// series keep one value per row and stay aligned by position.
pub fn compare(
    dataset: &Dataset,
    column_a: &str,
    column_b: &str,
    bins: usize,
) -> Result<PairedComparison, AnalysisError> {
    for column in [column_a, column_b] {
        if dataset.column_index(column).is_none() {
            return Err(AnalysisError::missing_column(column, &dataset.column_names));
        }
    }
    let zero_filled = |column: &str| -> Vec<f64> {
        super::numeric_cells(dataset, column)
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect()
    };
    let a = zero_filled(column_a);
    let b = zero_filled(column_b);

    if a.is_empty() {
        return Err(AnalysisError::NoValidData {
            column: column_a.to_string(),
        });
    }

    let stats = PairedStats {
        total_a: a.iter().sum(),
        total_b: b.iter().sum(),
        mean_a: stats::mean(&a).unwrap_or(0.0),
        mean_b: stats::mean(&b).unwrap_or(0.0),
        median_a: stats::median(&a).unwrap_or(0.0),
        median_b: stats::median(&b).unwrap_or(0.0),
        correlation: stats::pearson(&a, &b),
    };

    Ok(PairedComparison {
        a: PairedSeries::build(column_a, a, bins),
        b: PairedSeries::build(column_b, b, bins),
        stats,
    })
}

impl PairedStats {
    /// One-line summary with the given labels for the two series.
    pub fn summary_line(&self, label_a: &str, label_b: &str) -> String {
        let corr = self
            .correlation
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "{label_a} total: {:.0}   {label_b} total: {:.0}   Mean: {:.2}/{:.2}   \
             Median: {:.2}/{:.2}   Correlation: {corr}",
            self.total_a, self.total_b, self.mean_a, self.mean_b, self.median_a, self.median_b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn pairs(rows: &[(&str, &str)]) -> Dataset {
        Dataset::from_rows(
            vec!["interactions_patient".into(), "interactions_praticien".into()],
            rows.iter()
                .map(|(a, b)| vec![CellValue::from_raw(a), CellValue::from_raw(b)])
                .collect(),
        )
    }

    fn run(ds: &Dataset) -> PairedComparison {
        compare(ds, "interactions_patient", "interactions_praticien", 15).unwrap()
    }

    #[test]
    fn identical_series_correlate_perfectly() {
        let c = run(&pairs(&[("1", "1"), ("2", "2"), ("3", "3")]));
        assert!((c.stats.correlation.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reversed_series_correlate_negatively() {
        let c = run(&pairs(&[("1", "3"), ("2", "2"), ("3", "1")]));
        assert!((c.stats.correlation.unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_has_no_correlation() {
        let c = run(&pairs(&[("1", "4"), ("1", "9"), ("1", "2")]));
        assert_eq!(c.stats.correlation, None);
        assert!(c.stats.summary_line("Patient", "Professional").ends_with("Correlation: n/a"));
    }

    #[test]
    fn unparseable_cells_become_zero_and_rows_stay_aligned() {
        let c = run(&pairs(&[("4", "x"), ("", "6"), ("2", "2")]));
        assert_eq!(c.a.values, vec![4.0, 0.0, 2.0]);
        assert_eq!(c.b.values, vec![0.0, 6.0, 2.0]);
        assert_eq!(c.stats.total_a, 6.0);
        assert_eq!(c.stats.total_b, 8.0);
        assert_eq!(c.stats.mean_a, 2.0);
        assert_eq!(c.stats.median_b, 2.0);
        let h = c.a.histogram.as_ref().unwrap();
        assert_eq!(h.counts.iter().sum::<usize>(), 3);
        assert_eq!(h.counts.len(), 15);
    }

    #[test]
    fn missing_column_is_reported() {
        let ds = pairs(&[("1", "2")]);
        let err = compare(&ds, "interactions_patient", "absent", 15).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { ref requested, .. } if requested == "absent"));
    }

    #[test]
    fn boxplot_flags_outliers() {
        let b = BoxSummary::of(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!((b.q1, b.median, b.q3), (2.0, 3.0, 4.0));
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 4.0);
        assert_eq!(b.outliers, vec![100.0]);
    }
}
