//! # Diagram Export
//!
//! Sampled diagrams as CSV for spreadsheets and plotting tools.
//!
//! ```text
//! x,shear,moment,slope,deflection
//! 0.000000e0,5.000000e2,0.000000e0,-1.627604e-2,0.000000e0
//! ...
//! ```
//!
//! Breakpoints appear twice (left then right limit) so a plot of the rows
//! shows jumps as vertical steps.

use std::io::Write;

use crate::calculations::AnalysisResult;
use crate::errors::{CalcError, CalcResult};

/// Column headers, in row order
pub const CSV_HEADER: [&str; 5] = ["x", "shear", "moment", "slope", "deflection"];

fn csv_error(e: impl std::fmt::Display) -> CalcError {
    CalcError::SerializationError {
        reason: format!("Failed to write diagram CSV: {}", e),
    }
}

/// Write `result`'s diagrams sampled at `n` points plus breakpoints.
///
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(result: &AnalysisResult, n: usize, writer: W) -> CalcResult<usize> {
    let rows = result.sample_diagrams(n);
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for row in &rows {
        csv_writer
            .write_record([
                format!("{:.6e}", row.x),
                format!("{:.6e}", row.shear),
                format!("{:.6e}", row.moment),
                format!("{:.6e}", row.slope),
                format!("{:.6e}", row.deflection),
            ])
            .map_err(csv_error)?;
    }
    csv_writer.flush().map_err(csv_error)?;

    tracing::debug!("Wrote {} diagram rows", rows.len());
    Ok(rows.len())
}
