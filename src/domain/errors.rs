//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Parse failures are not
//! errors; they are `ParseFailure` values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Messenger error: {0}")]
    Messenger(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("UI error: {0}")]
    Ui(String),
}
