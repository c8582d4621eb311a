//! Structured logging setup.

mod format;

pub use format::{MatrixSummary, StructuredLogger};
