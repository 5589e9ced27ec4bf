//! Output module for persisting the final table and reporting a run
//!
//! This module handles:
//! - Rendering the table as the editor's data script
//! - Falling back to stdout when the data file cannot be written
//! - Printing run statistics

mod script;
pub mod stats;
mod traits;

pub use script::ScriptWriter;
pub use stats::{format_elapsed, print_statistics, IndexStatistics, RunTiming};
pub use traits::{OutputError, OutputResult, TableSink};

use crate::symbols::TokenLink;
use std::io::Write;

/// Where the table ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Written by the sink
    Persisted,
    /// The sink failed and the rendered table was dumped to the fallback writer
    DumpedToFallback,
}

/// Writes the table through `sink`, dumping it to `fallback` if persisting fails
///
/// A table that was collected over a long run is never silently lost: when
/// the sink cannot store it, the rendered script is written to `fallback`
/// (stdout in the binary) so it can be recovered by hand.
///
/// # Returns
///
/// * `Ok(WriteOutcome)` - Where the table was written
/// * `Err(OutputError)` - Rendering failed or neither destination accepted it
pub fn write_with_fallback<S, W>(
    sink: &S,
    table: &[TokenLink],
    fallback: &mut W,
) -> OutputResult<WriteOutcome>
where
    S: TableSink + ?Sized,
    W: Write + ?Sized,
{
    let rendered = sink.render(table)?;

    match sink.persist(&rendered) {
        Ok(()) => Ok(WriteOutcome::Persisted),
        Err(e) => {
            tracing::error!("Couldn't write data file: {}", e);
            tracing::error!("Dumping data to stdout instead");
            fallback.write_all(rendered.as_bytes())?;
            fallback.write_all(b"\n")?;
            fallback.flush()?;
            Ok(WriteOutcome::DumpedToFallback)
        }
    }
}
