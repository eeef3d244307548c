//! Descriptive statistics over a CSV export of recorded service sessions.
//!
//! The [`data`] layer loads and filters the table, [`analysis`] holds the
//! pure aggregations behind each view, and [`report`] runs them all with the
//! parameters in [`config`]. Rendering lives in the binaries.

pub mod analysis;
pub mod config;
pub mod data;
pub mod report;
