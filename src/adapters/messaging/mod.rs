//! Messenger adapters. Implement MessengerPort.
//!
//! LINE push API for production, console logger for development.

pub mod console_adapter;
pub mod line_adapter;

pub use console_adapter::{ConsoleMessenger, SentMessage};
pub use line_adapter::{DEFAULT_LINE_API_URL, LineAdapter};
