use std::io::{self, Write};

use colored::Colorize;

use super::{ChartBar, GroupReport, Report, ReportError, Reporter, Verdict};

/// Width of the chart area in characters.
const CHART_WIDTH: usize = 50;

/// A reporter that prints a comparison table, a bar chart and the verdict
/// to the terminal.
#[derive(Debug, Clone)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// Format a rate as a percentage.
    fn format_rate(rate: f64) -> String {
        format!("{:.2}%", rate * 100.0)
    }

    /// Format the change between control and treatment.
    fn format_change(report: &Report) -> String {
        let absolute = report.observed_difference() * 100.0;
        match report.relative_difference() {
            Some(relative) => format!("{:+.2} pp ({:+.2}%)", absolute, relative * 100.0),
            None => format!("{:+.2} pp", absolute),
        }
    }

    fn verdict_text(verdict: Verdict) -> &'static str {
        match verdict {
            Verdict::Increase => "significant increase",
            Verdict::Decrease => "significant decrease",
            Verdict::Inconclusive => "inconclusive",
        }
    }

    /// Format the verdict with appropriate coloring.
    fn format_verdict(&self, verdict: Verdict) -> String {
        let text = Self::verdict_text(verdict);
        if !self.use_colors {
            return text.to_string();
        }
        match verdict {
            Verdict::Increase => text.green().bold().to_string(),
            Verdict::Decrease => text.red().bold().to_string(),
            Verdict::Inconclusive => text.yellow().to_string(),
        }
    }

    /// Draw one bar scaled to `y_max`: `#` up to the rate, `-` across the
    /// interval and `|` at both interval bounds.
    fn render_bar(bar: &ChartBar, y_max: f64, width: usize) -> String {
        let position = |value: f64| {
            ((value / y_max) * width as f64)
                .round()
                .clamp(0.0, width as f64) as usize
        };

        let mut cells = vec![' '; width + 1];
        for cell in cells.iter_mut().take(position(bar.rate)) {
            *cell = '#';
        }

        let lower = position(bar.ci_lower);
        let upper = position(bar.ci_upper);
        for cell in cells.iter_mut().take(upper + 1).skip(lower) {
            if *cell == ' ' {
                *cell = '-';
            }
        }
        cells[lower] = '|';
        cells[upper] = '|';

        cells.into_iter().collect::<String>().trim_end().to_string()
    }

    /// Print the title and table header.
    fn print_header(&self, writer: &mut dyn Write, report: &Report) -> io::Result<()> {
        writeln!(writer)?;
        if self.use_colors {
            writeln!(writer, "{}", report.chart.title.bold())?;
        } else {
            writeln!(writer, "{}", report.chart.title)?;
        }
        writeln!(writer)?;

        let header = format!(
            "{:<16} {:>10} {:>12} {:>10} {:>22}",
            "Group", "Size", "Conversions", "Rate", "Interval"
        );
        if self.use_colors {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }
        writeln!(writer, "{}", "-".repeat(74))?;
        Ok(())
    }

    /// Print a single group row.
    fn print_row(&self, writer: &mut dyn Write, group: &GroupReport) -> io::Result<()> {
        let label = if group.config.label.chars().count() > 16 {
            format!("{}...", group.config.label.chars().take(13).collect::<String>())
        } else {
            group.config.label.clone()
        };
        let interval = format!(
            "[{}, {}]",
            Self::format_rate(group.stats.ci_lower),
            Self::format_rate(group.stats.ci_upper)
        );

        writeln!(
            writer,
            "{:<16} {:>10} {:>12} {:>10} {:>22}",
            label,
            group.stats.count,
            group.stats.successes,
            Self::format_rate(group.stats.rate),
            interval,
        )?;
        Ok(())
    }

    /// Print the bar chart.
    fn print_chart(&self, writer: &mut dyn Write, report: &Report) -> io::Result<()> {
        writeln!(writer)?;
        for bar in &report.chart.bars {
            writeln!(
                writer,
                "{:<16} {}",
                bar.label,
                Self::render_bar(bar, report.chart.y_max, CHART_WIDTH)
            )?;
        }
        writeln!(
            writer,
            "{:<16} 0{:>width$}",
            "",
            Self::format_rate(report.chart.y_max),
            width = CHART_WIDTH
        )?;
        Ok(())
    }

    /// Print the test statistics and verdict footer.
    fn print_summary(&self, writer: &mut dyn Write, report: &Report) -> io::Result<()> {
        let test = &report.test;

        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(74))?;
        writeln!(
            writer,
            "Welch's t-test ({}): t = {:.4}, df = {:.2}, p-value = {:.4}, alpha = {:.3}",
            test.alternative, test.t_statistic, test.degrees_of_freedom, test.p_value, test.threshold
        )?;
        writeln!(writer, "Change: {}", Self::format_change(report))?;

        let label = "Result:";
        if self.use_colors {
            write!(writer, "{} ", label.bold())?;
        } else {
            write!(writer, "{} ", label)?;
        }
        writeln!(writer, "{}", self.format_verdict(report.verdict()))?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn write_report(&self, writer: &mut dyn Write, report: &Report) -> Result<(), ReportError> {
        self.print_header(writer, report)?;
        self.print_row(writer, &report.control)?;
        self.print_row(writer, &report.treatment)?;
        self.print_chart(writer, report)?;
        self.print_summary(writer, report)?;
        Ok(())
    }
}
