use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::distribution::ClampRange;
use crate::analysis::ColumnResolver;

// ---------------------------------------------------------------------------
// Per-view parameters
// ---------------------------------------------------------------------------

/// Every tunable of the six views. Unset fields in a config file keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub top_values: TopValuesConfig,
    pub entries_over_time: EntriesOverTimeConfig,
    pub service_table: ServiceTableConfig,
    pub quality_histogram: HistogramConfig,
    pub interactions: InteractionsConfig,
    pub grades: HistogramConfig,
    pub resolver: ColumnResolver,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            top_values: TopValuesConfig::default(),
            entries_over_time: EntriesOverTimeConfig::default(),
            service_table: ServiceTableConfig::default(),
            quality_histogram: HistogramConfig {
                column: "qualite_score".into(),
                bins: 10,
                clamp: None,
            },
            interactions: InteractionsConfig::default(),
            grades: HistogramConfig {
                column: "note_practicien".into(),
                bins: 10,
                clamp: Some(ClampRange::new(0.0, 5.0)),
            },
            resolver: ColumnResolver::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopValuesConfig {
    pub column: String,
    /// Entries in the ranked summary above the table.
    pub top_k: usize,
    /// Rows of the frequency table; `None` lists every value.
    pub table_rows: Option<usize>,
}

impl Default for TopValuesConfig {
    fn default() -> Self {
        TopValuesConfig {
            column: "langue".into(),
            top_k: 3,
            table_rows: Some(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntriesOverTimeConfig {
    pub date_column: String,
    /// Session length in minutes.
    pub duration_column: String,
}

impl Default for EntriesOverTimeConfig {
    fn default() -> Self {
        EntriesOverTimeConfig {
            date_column: "date".into(),
            duration_column: "duree_minutes".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceTableConfig {
    pub filter_column: String,
}

impl Default for ServiceTableConfig {
    fn default() -> Self {
        ServiceTableConfig {
            filter_column: "service".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    pub column: String,
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default)]
    pub clamp: Option<ClampRange>,
}

fn default_bins() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionsConfig {
    pub patient_column: String,
    pub professional_column: String,
    pub bins: usize,
}

impl Default for InteractionsConfig {
    fn default() -> Self {
        InteractionsConfig {
            patient_column: "interactions_patient".into(),
            professional_column: "interactions_praticien".into(),
            bins: 15,
        }
    }
}

impl AnalyzerConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Read `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let config = Self::from_json_file(p)?;
                log::info!("loaded config from {}", p.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
