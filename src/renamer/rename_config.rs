use std::num::NonZeroUsize;

pub const DEFAULT_MAX_RENAME_ATTEMPTS: usize = 100_000;

/// Whether the rename pass touches the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Compute and report the new names, renaming only the in-memory tree.
    #[default]
    Preview,
    /// Rename entries on disk.
    Commit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameConfig {
    /// Candidate names tried per entry before giving up.
    pub max_rename_attempts: NonZeroUsize,
    /// Maximum basename length in bytes, before any attempt suffix.
    pub max_basename_length: NonZeroUsize,
    pub mode: RunMode,
}
