use std::path::Path;

use colored::Colorize;

/// Receives the outcome of every entry visited by the rename pass.
pub trait ReportSink {
    fn unmodified(&mut self, path: &Path);
    fn renamed(&mut self, from: &Path, to: &Path);
}

/// Prints one line per entry to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReport;

impl ConsoleReport {
    /// Creates the report and turns colors off when stdout cannot show them.
    pub fn detect() -> Self {
        if supports_color::on(supports_color::Stream::Stdout).is_none() {
            colored::control::set_override(false);
        }
        Self
    }
}

impl ReportSink for ConsoleReport {
    fn unmodified(&mut self, path: &Path) {
        println!("{} [unmodified]", path.display());
    }

    fn renamed(&mut self, from: &Path, to: &Path) {
        println!(
            "{} => {}",
            from.display().to_string().red(),
            to.display().to_string().green()
        );
    }
}

/// Drops every outcome.
#[derive(Debug, Default)]
pub struct SilentReport;

impl ReportSink for SilentReport {
    fn unmodified(&mut self, _path: &Path) {}

    fn renamed(&mut self, _from: &Path, _to: &Path) {}
}
