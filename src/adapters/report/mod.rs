//! Report rendering: CSV export of the study log.

pub mod csv_utils;

pub use csv_utils::study_logs_to_csv;
