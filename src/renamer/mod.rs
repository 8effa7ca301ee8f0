//! The rename pass: turns every entry of a [`PathTree`](crate::filesystem::PathTree)
//! into a sanitized, collision-free name and optionally applies it on disk.

mod engine;
mod rename_config;
mod report;
mod truncate;

pub use engine::{RenameEngine, RenameError, RenameSummary};
pub use rename_config::{DEFAULT_MAX_RENAME_ATTEMPTS, RenameConfig, RunMode};
pub use report::{ConsoleReport, ReportSink, SilentReport};
