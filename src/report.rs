use serde::Serialize;

use crate::analysis::distribution::{compute_histogram, Histogram};
use crate::analysis::frequency::{frequency_table, FrequencyTable};
use crate::analysis::paired::{compare, PairedComparison};
use crate::analysis::timeseries::{weekly_series, WeeklySeries};
use crate::analysis::{resolve_column, AnalysisError};
use crate::config::{AnalyzerConfig, HistogramConfig};
use crate::data::filter::{filter_options, RowFilter};
use crate::data::model::Dataset;

/// Outcome of one view: its data, or the reason it has none.
pub type ViewResult<T> = Result<T, AnalysisError>;

/// Every view computed once over a loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub row_count: usize,
    pub columns: Vec<String>,
    pub top_values: ViewResult<FrequencyTable>,
    pub entries_over_time: ViewResult<WeeklySeries>,
    /// Resolved filter column and its dropdown labels.
    pub service_filter: ViewResult<ServiceFilter>,
    pub quality_histogram: ViewResult<Histogram>,
    pub interactions: ViewResult<PairedComparison>,
    pub grades: ViewResult<Histogram>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceFilter {
    pub column: String,
    pub options: Vec<String>,
}

impl SessionReport {
    pub fn build(dataset: &Dataset, config: &AnalyzerConfig) -> Self {
        let resolver = &config.resolver;

        let top_values = resolve_column(dataset, resolver, &config.top_values.column)
            .map(|col| frequency_table(dataset, col));

        let eot = &config.entries_over_time;
        let entries_over_time = resolve_column(dataset, resolver, &eot.date_column).map(|date| {
            // A missing duration column only blanks the averages.
            let duration = resolver
                .resolve(&eot.duration_column, &dataset.column_names)
                .unwrap_or(eot.duration_column.as_str());
            weekly_series(dataset, date, duration)
        });

        let service_filter =
            resolve_column(dataset, resolver, &config.service_table.filter_column).map(|col| {
                ServiceFilter {
                    column: col.to_string(),
                    options: filter_options(dataset, col)
                        .iter()
                        .map(RowFilter::label)
                        .collect(),
                }
            });

        let ic = &config.interactions;
        let interactions = resolve_column(dataset, resolver, &ic.patient_column).and_then(|a| {
            let b = resolve_column(dataset, resolver, &ic.professional_column)?;
            compare(dataset, a, b, ic.bins)
        });

        let report = SessionReport {
            row_count: dataset.len(),
            columns: dataset.column_names.clone(),
            top_values,
            entries_over_time,
            service_filter,
            quality_histogram: histogram_view(dataset, config, &config.quality_histogram),
            interactions,
            grades: histogram_view(dataset, config, &config.grades),
        };
        log::info!(
            "report built over {} rows ({} views without data)",
            report.row_count,
            report.unavailable_views()
        );
        report
    }

    /// Number of views that ended in a degraded state.
    pub fn unavailable_views(&self) -> usize {
        [
            self.top_values.is_err(),
            self.entries_over_time.is_err(),
            self.service_filter.is_err(),
            self.quality_histogram.is_err(),
            self.interactions.is_err(),
            self.grades.is_err(),
        ]
        .into_iter()
        .filter(|&e| e)
        .count()
    }
}

fn histogram_view(
    dataset: &Dataset,
    config: &AnalyzerConfig,
    view: &HistogramConfig,
) -> ViewResult<Histogram> {
    let col = resolve_column(dataset, &config.resolver, &view.column)?;
    compute_histogram(dataset, col, view.bins, view.clamp)
}
