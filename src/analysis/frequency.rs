use std::collections::HashMap;

use serde::Serialize;

use crate::data::model::{CellValue, Dataset};

/// Count of one distinct value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub value: CellValue,
    pub count: usize,
    /// Share of all non-missing cells in the column, in percent.
    pub percentage: f64,
}

/// Value counts of a categorical column, ranked by descending count.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FrequencyTable {
    pub column: String,
    /// Number of non-missing cells; the denominator of every percentage.
    pub total: usize,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` highest-ranked entries. Percentages still refer to the whole
    /// column, so they need not sum to 100 over the slice.
    pub fn top(&self, k: usize) -> &[FrequencyEntry] {
        &self.entries[..k.min(self.entries.len())]
    }

    /// `"1. fr: 12 (40.0%)"` lines for the top `k` entries.
    pub fn summary_lines(&self, k: usize) -> Vec<String> {
        self.top(k)
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}: {} ({:.1}%)", i + 1, e.value, e.count, e.percentage))
            .collect()
    }
}

/// Count every distinct non-missing value of `column`.
///
/// Ties keep the order in which the values first appear. An absent column
/// yields an empty table.
pub fn frequency_table(dataset: &Dataset, column: &str) -> FrequencyTable {
    let Some(cells) = dataset.column(column) else {
        return FrequencyTable {
            column: column.to_string(),
            ..Default::default()
        };
    };

    let mut slot: HashMap<&CellValue, usize> = HashMap::new();
    let mut counted: Vec<(&CellValue, usize)> = Vec::new();
    for cell in cells.filter(|c| !c.is_null()) {
        match slot.get(cell) {
            Some(&i) => counted[i].1 += 1,
            None => {
                slot.insert(cell, counted.len());
                counted.push((cell, 1));
            }
        }
    }
    // Stable sort: equal counts stay in first-seen order.
    counted.sort_by(|a, b| b.1.cmp(&a.1));

    let total: usize = counted.iter().map(|(_, n)| n).sum();
    let entries = counted
        .into_iter()
        .map(|(value, count)| FrequencyEntry {
            value: value.clone(),
            count,
            percentage: count as f64 * 100.0 / total as f64,
        })
        .collect();

    FrequencyTable {
        column: column.to_string(),
        total,
        entries,
    }
}
