//! Post-processing of event logs: CSV export and per-machine summaries.

pub mod csv;
pub mod summary;

pub use csv::{write_csv, CSV_HEADER};
pub use summary::{LineSummary, MachineSummary};
