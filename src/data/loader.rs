use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Options controlling how delimited text is parsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Field delimiter; sniffed from the header line when `None`.
    pub delimiter: Option<u8>,
}

/// Delimiters tried by [`sniff_delimiter`], in tie-breaking order.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Load a session dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – delimited text, delimiter sniffed from the header
/// * `.tsv`          – tab-separated text
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let options = match ext.as_str() {
        "csv" | "txt" => LoadOptions::default(),
        "tsv" => LoadOptions {
            delimiter: Some(b'\t'),
        },
        other => bail!("Unsupported file extension: .{other}"),
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    load_str(&text, options)
}

/// Load a dataset from any reader holding UTF-8 delimited text.
pub fn load_reader<R: Read>(mut reader: R, options: LoadOptions) -> Result<Dataset> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("reading delimited text")?;
    load_str(&text, options)
}

// ---------------------------------------------------------------------------
// Delimited text parsing
// ---------------------------------------------------------------------------

/// Layout: header row with column names, every other row is data.
/// Every record must have exactly as many fields as the header.
fn load_str(text: &str, options: LoadOptions) -> Result<Dataset> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| sniff_delimiter(text.lines().next().unwrap_or("")));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("CSV header row is empty");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {}: expected {} fields but found {}",
                row_no + 1,
                headers.len(),
                record.len()
            );
        }
        rows.push(record.iter().map(CellValue::from_raw).collect());
    }

    log::debug!(
        "parsed {} rows x {} columns (delimiter {:?})",
        rows.len(),
        headers.len(),
        delimiter as char
    );

    Ok(Dataset::from_rows(headers, rows))
}

/// Pick the candidate delimiter occurring most often in the header line.
/// Commas win ties, including the no-delimiter case of a single column.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;
    for &d in &CANDIDATE_DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == d).count();
        if count > best_count {
            best = d;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<Dataset> {
        load_reader(text.as_bytes(), LoadOptions::default())
    }

    #[test]
    fn loads_header_and_typed_rows() {
        let ds = load("date,service,duree_minutes\n2024-01-01,cardio,45\n2024-01-02,neuro,\n")
            .unwrap();
        assert_eq!(ds.column_names, vec!["date", "service", "duree_minutes"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0][2], CellValue::Integer(45));
        assert_eq!(ds.rows[1][2], CellValue::Null);
    }

    #[test]
    fn sniffs_semicolons_and_strips_bom() {
        let ds = load("\u{feff}langue;service\nfr;cardio\n").unwrap();
        assert_eq!(ds.column_names, vec!["langue", "service"]);
        assert_eq!(ds.rows[0][0], CellValue::Text("fr".into()));
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let ds = load("service,comment\ncardio,\"late, rescheduled\"\n").unwrap();
        assert_eq!(ds.rows[0][1], CellValue::Text("late, rescheduled".into()));
    }

    #[test]
    fn ragged_rows_fail_to_load() {
        let err = load("a,b\n1,2\n3\n").unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 2"));
    }

    #[test]
    fn empty_input_fails_to_load() {
        assert!(load("").is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("sessions.parquet")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn comma_wins_delimiter_ties() {
        assert_eq!(sniff_delimiter("a,b;c"), b',');
        assert_eq!(sniff_delimiter("a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter("single"), b',');
    }
}
