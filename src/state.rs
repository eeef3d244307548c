use std::path::Path;
use std::sync::Arc;

use session_analyzer::config::AnalyzerConfig;
use session_analyzer::data::filter::{filter_rows, sort_view, RowFilter, SortState, TableView};
use session_analyzer::data::loader::load_file;
use session_analyzer::data::model::Dataset;
use session_analyzer::report::SessionReport;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    TopValues,
    EntriesOverTime,
    ServiceTable,
    QualityHistogram,
    Interactions,
    Grades,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::TopValues,
        Tab::EntriesOverTime,
        Tab::ServiceTable,
        Tab::QualityHistogram,
        Tab::Interactions,
        Tab::Grades,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::TopValues => "Top Values",
            Tab::EntriesOverTime => "Entries Over Time",
            Tab::ServiceTable => "Service Table",
            Tab::QualityHistogram => "Qualite Score Histogram",
            Tab::Interactions => "Interactions Compare",
            Tab::Grades => "Practitioner Grades",
        }
    }
}

/// Filter and sort selections of the raw-data table.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub filter: RowFilter,
    pub sort: SortState,
    /// Rows currently shown (cached).
    pub view: TableView,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AnalyzerConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// All views computed for the loaded dataset.
    pub report: Option<Arc<SessionReport>>,

    pub active_tab: Tab,

    pub table: TableState,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            dataset: None,
            report: None,
            active_tab: Tab::default(),
            table: TableState::default(),
            status_message: None,
            loading: false,
        }
    }

    /// Ingest a newly loaded dataset, compute every view and reset the table.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.report = Some(Arc::new(SessionReport::build(&dataset, &self.config)));
        self.table = TableState {
            view: TableView::all(&dataset),
            ..TableState::default()
        };
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Load `path`; on failure the previous dataset stays in place.
    pub fn open_path(&mut self, path: &Path) {
        self.loading = true;
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Failed to load CSV: {e:#}"));
                self.loading = false;
            }
        }
    }

    /// Column the table filter applies to, once resolved.
    pub fn filter_column(&self) -> Option<&str> {
        self.report
            .as_ref()?
            .service_filter
            .as_ref()
            .ok()
            .map(|f| f.column.as_str())
    }

    /// Recompute the table view after a filter or sort change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let column = self.filter_column().unwrap_or_default().to_string();
        let mut view = filter_rows(ds, &column, &self.table.filter);
        if let Some(sort_col) = &self.table.sort.column {
            view = sort_view(ds, &view, sort_col, self.table.sort.ascending);
        }
        log::debug!("table view: {} of {} rows", view.len(), ds.len());
        self.table.view = view;
    }

    /// Select a dropdown entry of the table filter.
    pub fn set_filter(&mut self, filter: RowFilter) {
        self.table.filter = filter;
        self.refilter();
    }

    /// Header click on `column`: toggles direction for the same column.
    pub fn request_sort(&mut self, column: &str) {
        self.table.sort.request(column);
        self.refilter();
    }
}
