//! Output sink trait and error types
//!
//! This module defines the interface the final table is handed to and the
//! errors writing it may produce.

use crate::symbols::TokenLink;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the final table
///
/// Rendering and persisting are separate steps so a caller can still surface
/// the rendered data when persisting fails.
pub trait TableSink {
    /// Serializes the table
    fn render(&self, table: &[TokenLink]) -> OutputResult<String>;

    /// Stores an already rendered table
    fn persist(&self, rendered: &str) -> OutputResult<()>;

    /// Renders and persists the table
    fn write_table(&self, table: &[TokenLink]) -> OutputResult<()> {
        let rendered = self.render(table)?;
        self.persist(&rendered)
    }
}
