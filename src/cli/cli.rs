use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};

use crate::application::data::LogLevel;
use crate::renamer::DEFAULT_MAX_RENAME_ATTEMPTS;

const EXAMPLES: &str = "\
Examples:
  # Show what would be renamed below /volume1/music, the directory itself
  # included. Nothing is modified.
  $ tidyname /volume1/music

  # Rename everything below /volume1/music, the directory itself included.
  # This modifies your data, always do a dry run first.
  $ tidyname --force /volume1/music";

/// Sanitizes the names of files and directories by replacing umlauts, accents
/// and similar diacritics, characters that filesystems reject and reserved
/// device names. Performs a dry run unless --force is given.
#[derive(Parser, Debug, Clone)]
#[command(version, after_help = EXAMPLES, disable_version_flag = true)]
pub struct Cli {
    /// Path to process, including all sub-directories and files if it is a directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Only show what would be done (default mode)
    #[arg(long, short)]
    pub dry_run: bool,

    /// Make actual changes to the filesystem. This modifies your data
    #[arg(long, short)]
    pub force: bool,

    /// Maximum number of rename attempts per file or directory before giving up
    #[arg(
        long,
        short = 'n',
        default_value_t = DEFAULT_MAX_RENAME_ATTEMPTS as i64,
        allow_negative_numbers = true
    )]
    pub max_rename_attempts: i64,

    /// Maximum number of bytes in a sanitized name. File extensions are
    /// preserved, a collision suffix may be added on top
    #[arg(long, short, value_name = "BYTES", allow_negative_numbers = true)]
    pub truncate: Option<i64>,

    /// Suppress the per-entry report during a dry run
    #[arg(long, short)]
    pub silent: bool,

    /// Additional file or directory name to skip, may be repeated
    #[arg(long = "skip", value_name = "NAME")]
    pub skip: Vec<String>,

    #[arg(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Print version information and exit
    #[arg(long, short = 'v', action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    /// Parses the process arguments. Help and usage errors exit with status 1,
    /// the version display with status 0.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(error) => {
                let code = match error.kind() {
                    ErrorKind::DisplayVersion => 0,
                    _ => 1,
                };
                let _ = error.print();
                process::exit(code);
            }
        }
    }
}
