use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::stats;
use crate::data::model::{CellValue, Dataset};

/// Datetime layouts accepted in the date column, tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Date-only layouts; slashed dates are read month first, dotted dates day first.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

/// Parse a date cell, ignoring any time-of-day component.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    let text = match cell {
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Integer(i) => i.to_string(),
        _ => return None,
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&text, format) {
            return Some(dt.date());
        }
    }
    // Fractional seconds trail the datetime layouts above.
    if let Some((head, _)) = text.split_once('.') {
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(head, format) {
                return Some(dt.date());
            }
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Entries recorded in one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub entry_count: usize,
    /// Mean of the parseable durations in the week, in minutes.
    pub mean_duration: Option<f64>,
}

/// A mean duration split into whole hours and minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionLength {
    pub hours: i64,
    /// Always in `0..60`, also for negative durations.
    pub minutes: i64,
}

impl SessionLength {
    /// Floored split: `-30.0` minutes is `-1h 30min`.
    pub fn from_minutes(mean_minutes: f64) -> Self {
        SessionLength {
            hours: (mean_minutes / 60.0).floor() as i64,
            minutes: mean_minutes.rem_euclid(60.0).floor() as i64,
        }
    }
}

impl fmt::Display for SessionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}min", self.hours, self.minutes)
    }
}

/// Week-by-week entry counts with session durations.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeeklySeries {
    /// Ascending by `week_start`.
    pub buckets: Vec<WeeklyBucket>,
    /// Mean over every parseable duration of the dated rows.
    pub mean_duration: Option<f64>,
    /// Rows dropped because their date did not parse.
    pub undated_rows: usize,
}

impl WeeklySeries {
    pub fn average_session(&self) -> Option<SessionLength> {
        self.mean_duration.map(SessionLength::from_minutes)
    }

    /// `"Average session time: 1h 5min"`, or `N/A` without durations.
    pub fn average_label(&self) -> String {
        match self.average_session() {
            Some(len) => format!("Average session time: {len}"),
            None => "Average session time: N/A".to_string(),
        }
    }
}

/// Bucket rows by the ISO week of `date_column`.
///
/// Rows whose date does not parse are dropped entirely. A duration that does
/// not parse still counts the row but is left out of the means; an absent
/// duration column leaves every mean empty.
pub fn weekly_series(dataset: &Dataset, date_column: &str, duration_column: &str) -> WeeklySeries {
    let Some(dates) = dataset.column(date_column) else {
        return WeeklySeries::default();
    };
    let durations = super::numeric_cells(dataset, duration_column);

    let mut weeks: BTreeMap<NaiveDate, (usize, Vec<f64>)> = BTreeMap::new();
    let mut all_durations = Vec::new();
    let mut undated_rows = 0;

    for (row, cell) in dates.enumerate() {
        let Some(date) = parse_date(cell) else {
            undated_rows += 1;
            continue;
        };
        let slot = weeks.entry(week_start(date)).or_default();
        slot.0 += 1;
        if let Some(d) = durations.get(row).copied().flatten() {
            slot.1.push(d);
            all_durations.push(d);
        }
    }

    if undated_rows > 0 {
        log::debug!("{undated_rows} rows without a parseable '{date_column}' skipped");
    }

    let buckets = weeks
        .into_iter()
        .map(|(week_start, (entry_count, durations))| WeeklyBucket {
            week_start,
            entry_count,
            mean_duration: stats::mean(&durations),
        })
        .collect();

    WeeklySeries {
        buckets,
        mean_duration: stats::mean(&all_durations),
        undated_rows,
    }
}
