use std::io::Write;

use super::{Report, ReportError, Reporter};

/// Writes the whole report as pretty-printed JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for JsonReporter {
    fn write_report(&self, writer: &mut dyn Write, report: &Report) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)?;
        Ok(())
    }
}
