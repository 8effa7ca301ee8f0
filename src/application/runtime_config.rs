use std::num::NonZeroUsize;
use std::path::PathBuf;

use snafu::{OptionExt, Snafu};

use crate::cli::Cli;
use crate::filesystem::SkipSet;
use crate::renamer::{RenameConfig, RunMode};

/// Everything a run needs, validated.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub skip_set: SkipSet,
    pub rename: RenameConfig,
    pub silent: bool,
}

impl RuntimeConfig {
    /// The per-entry report is only suppressed for dry runs.
    pub fn suppress_report(&self) -> bool {
        self.silent && self.rename.mode == RunMode::Preview
    }
}

impl TryFrom<Cli> for RuntimeConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let max_rename_attempts = positive(cli.max_rename_attempts).context(
            InvalidMaxRenameAttemptsSnafu {
                value: cli.max_rename_attempts,
            },
        )?;
        let max_basename_length = match cli.truncate {
            Some(value) => positive(value).context(InvalidTruncateSnafu { value })?,
            None => NonZeroUsize::MAX,
        };
        let mode = if cli.force && !cli.dry_run {
            RunMode::Commit
        } else {
            RunMode::Preview
        };

        Ok(Self {
            root: cli.path,
            skip_set: SkipSet::default().with_names(cli.skip),
            rename: RenameConfig {
                max_rename_attempts,
                max_basename_length,
                mode,
            },
            silent: cli.silent,
        })
    }
}

fn positive(value: i64) -> Option<NonZeroUsize> {
    usize::try_from(value).ok().and_then(NonZeroUsize::new)
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display(
        "Max number of rename attempts must be >= 1, you provided {}",
        value
    ))]
    InvalidMaxRenameAttempts { value: i64 },
    #[snafu(display(
        "Max number of bytes in the name of a file or directory must be >= 1, you provided {}",
        value
    ))]
    InvalidTruncate { value: i64 },
}
