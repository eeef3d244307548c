/// Rendering of [`crate::state::AppState`]: menu and navigation panels,
/// chart views, and the raw-data table.
pub mod panels;
pub mod plot;
pub mod table;
