use serde::Serialize;
use thiserror::Error;

/// Why a view has nothing to draw.
///
/// These are display states rather than failures: the presentation layer
/// renders the message in place of the chart.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisError {
    #[error("Missing column: {requested}. Available: {}", .available.join(", "))]
    MissingColumn {
        requested: String,
        available: Vec<String>,
    },

    #[error("No valid data in column '{column}'")]
    NoValidData { column: String },

    #[error("No data in {min}-{max} range for column '{column}'")]
    NoDataInRange { column: String, min: f64, max: f64 },
}

impl AnalysisError {
    pub fn missing_column(requested: &str, available: &[String]) -> Self {
        AnalysisError::MissingColumn {
            requested: requested.to_string(),
            available: available.to_vec(),
        }
    }
}
