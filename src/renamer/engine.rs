use std::path::PathBuf;

use snafu::{ResultExt, Snafu};
use tracing::{debug, trace};

use crate::filesystem::{NodeId, PathTree, Renamer};
use crate::renamer::truncate::{
    ExtensionTooLongError, suffix_width, truncate_name, with_attempt_suffix,
};
use crate::renamer::{RenameConfig, ReportSink, RunMode};
use crate::sanitize::sanitize;

/// What happened to a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The entry got a new name.
    Renamed,
    /// The name was already clean but an ancestor was renamed.
    Moved,
    Unmodified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    pub moved: usize,
    pub unmodified: usize,
}

impl RenameSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Renamed => self.renamed += 1,
            Outcome::Moved => self.moved += 1,
            Outcome::Unmodified => self.unmodified += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.renamed + self.moved + self.unmodified
    }
}

/// Walks a [`PathTree`] top-down and gives every entry a sanitized name that no
/// sibling already uses.
///
/// An entry is settled completely before any of its children is looked at, so
/// children always see the final name of their parent. The first error stops
/// the walk; renames committed before it stay in place.
pub struct RenameEngine<'a> {
    config: &'a RenameConfig,
    renamer: &'a mut dyn Renamer,
    report: &'a mut dyn ReportSink,
}

impl<'a> RenameEngine<'a> {
    pub fn new(
        config: &'a RenameConfig,
        renamer: &'a mut dyn Renamer,
        report: &'a mut dyn ReportSink,
    ) -> Self {
        Self {
            config,
            renamer,
            report,
        }
    }

    pub fn run(&mut self, tree: &mut PathTree) -> Result<RenameSummary, RenameError> {
        let mut summary = RenameSummary::default();
        let root = tree.root();
        self.rename_subtree(tree, root, &mut summary)?;
        Ok(summary)
    }

    fn rename_subtree(
        &mut self,
        tree: &mut PathTree,
        id: NodeId,
        summary: &mut RenameSummary,
    ) -> Result<(), RenameError> {
        let outcome = self.rename_node(tree, id)?;
        summary.record(outcome);

        let children = tree.node(id).children().to_vec();
        for child in children {
            self.rename_subtree(tree, child, summary)?;
        }
        Ok(())
    }

    fn rename_node(&mut self, tree: &mut PathTree, id: NodeId) -> Result<Outcome, RenameError> {
        let node = tree.node(id);
        let original_path = node.original_path().to_path_buf();
        if node.is_anchor() {
            self.report.unmodified(&original_path);
            return Ok(Outcome::Unmodified);
        }

        let is_dir = node.is_dir();
        let sanitized = sanitize(node.name());
        let truncated = truncate_name(
            &sanitized,
            is_dir,
            self.config.max_basename_length.get(),
        )
        .context(ExtensionTooLongSnafu {
            path: original_path.clone(),
        })?;

        let max_attempts = self.config.max_rename_attempts.get();
        let width = suffix_width(max_attempts);
        for attempt in 0..max_attempts {
            let candidate = match attempt {
                0 => truncated.clone(),
                _ => with_attempt_suffix(&truncated, is_dir, attempt, width),
            };
            trace!(
                "Attempt {attempt} for {id} ({}): '{candidate}'",
                original_path.display()
            );

            if candidate == tree.node(id).name() {
                let current_path = tree.current_path(id);
                if current_path == original_path {
                    self.report.unmodified(&original_path);
                    return Ok(Outcome::Unmodified);
                }
                self.report.renamed(&original_path, &current_path);
                return Ok(Outcome::Moved);
            }

            if tree.has_sibling_named(id, &candidate) {
                debug!(
                    "Name '{candidate}' for {id} ({}) is taken by a sibling",
                    original_path.display()
                );
                continue;
            }

            tree.set_name(id, candidate);
            let destination = tree.current_path(id);
            if self.config.mode == RunMode::Commit {
                let source = tree.rename_source_path(id);
                self.renamer
                    .rename(&source, &destination)
                    .context(RenameIoSnafu {
                        from: source.clone(),
                        to: destination.clone(),
                    })?;
            }
            self.report.renamed(&original_path, &destination);
            return Ok(Outcome::Renamed);
        }

        RetriesExhaustedSnafu {
            path: original_path,
            attempts: max_attempts,
        }
        .fail()
    }
}

#[derive(Debug, Snafu)]
pub enum RenameError {
    #[snafu(display("Failed to shorten the name of '{}'", path.display()))]
    ExtensionTooLong {
        path: PathBuf,
        source: ExtensionTooLongError,
    },
    #[snafu(display(
        "Failed to rename '{}' (no rename attempts left after {} tries)",
        path.display(),
        attempts
    ))]
    RetriesExhausted { path: PathBuf, attempts: usize },
    #[snafu(display("Failed to rename '{}' to '{}'", from.display(), to.display()))]
    RenameIo {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}
