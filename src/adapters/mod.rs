//! Infrastructure adapters. Implement outbound ports.
//!
//! LINE messaging, SQLite persistence, CSV reports, terminal UI. Map errors to DomainError.

pub mod messaging;
pub mod persistence;
pub mod report;
pub mod ui;
