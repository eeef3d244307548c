/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse delimited text → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  header-ordered rows of CellValue, unique values per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  equality filter + toggling sort → TableView (row indices)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
