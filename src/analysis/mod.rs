/// Analysis layer: pure aggregations over a loaded `Dataset`.
///
/// ```text
///   Dataset ──► resolver  (logical name → actual header)
///      │
///      ├──► frequency     value counts, ranks, percentages
///      ├──► timeseries    ISO-week buckets, mean durations
///      ├──► distribution  histogram bins + summary statistics
///      └──► paired        row-aligned comparison of two columns
/// ```
///
/// Every function here borrows the dataset immutably and returns a plain,
/// serializable result; nothing is cached between calls.

pub mod distribution;
pub mod error;
pub mod frequency;
pub mod paired;
pub mod resolver;
pub mod stats;
pub mod timeseries;

pub use error::AnalysisError;
pub use resolver::ColumnResolver;

use crate::data::model::Dataset;

/// Resolve `target` against the dataset's headers, or describe what is
/// available instead.
pub fn resolve_column<'a>(
    dataset: &'a Dataset,
    resolver: &ColumnResolver,
    target: &str,
) -> Result<&'a str, AnalysisError> {
    resolver
        .resolve(target, &dataset.column_names)
        .ok_or_else(|| {
            log::warn!("column '{target}' not found in {:?}", dataset.column_names);
            AnalysisError::missing_column(target, &dataset.column_names)
        })
}

/// Numeric coercion of one column: `None` for cells that do not parse.
pub(crate) fn numeric_cells(dataset: &Dataset, column: &str) -> Vec<Option<f64>> {
    dataset
        .column(column)
        .map(|cells| cells.map(|c| c.as_f64()).collect())
        .unwrap_or_default()
}
