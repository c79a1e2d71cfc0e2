//! Cross-cutting helpers shared by adapters and use cases.

pub mod clock;
pub mod config;
