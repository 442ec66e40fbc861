use std::io::Write;

use super::{Report, ReportError, Reporter};

/// Writes the report narrative as markdown.
#[derive(Debug, Clone, Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for MarkdownReporter {
    fn write_report(&self, writer: &mut dyn Write, report: &Report) -> Result<(), ReportError> {
        writeln!(writer, "{}", report.narrative)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn test_writes_narrative() {
        let report = fixtures::report(0.001);

        let mut buffer = Vec::new();
        MarkdownReporter::new()
            .write_report(&mut buffer, &report)
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.trim_end(), report.narrative);
    }
}
