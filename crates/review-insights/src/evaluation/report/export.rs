use std::io::Write;

use crate::evaluation::interview::InterviewRow;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to encode breakdown row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush breakdown export: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the per-interview breakdown table as CSV with a header row.
pub fn write_interview_rows_csv<W: Write>(
    rows: &[InterviewRow],
    writer: W,
) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
