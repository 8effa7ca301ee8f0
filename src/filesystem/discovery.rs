use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::ext::PathExt;
use crate::filesystem::{PathTree, TreeError};

/// Basenames skipped by default. `@eaDir` holds the thumbnails and metadata a
/// Synology NAS keeps next to the user's files.
pub const DEFAULT_SKIP_NAMES: [&str; 1] = ["@eaDir"];

/// Basenames that exclude an entry, and everything below it, from discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipSet {
    names: HashSet<OsString>,
}

impl SkipSet {
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// True if any segment of `path` is one of the skipped basenames.
    pub fn matches(&self, path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::Normal(segment) => self.names.contains(segment),
            _ => false,
        })
    }
}

impl Default for SkipSet {
    fn default() -> Self {
        Self::empty().with_names(DEFAULT_SKIP_NAMES)
    }
}

/// Walks the filesystem below `root` and mirrors it into a [`PathTree`].
///
/// Entries are visited parents first with siblings sorted by file name.
/// Symbolic links are recorded as files and never followed. Skipped entries
/// are not descended into, but their names still block renames of siblings.
pub fn discover(root: impl AsRef<Path>, skip: &SkipSet) -> Result<PathTree, DiscoveryError> {
    let root = root.as_ref().clean();
    if matches!(root.try_exists(), Ok(false)) {
        return RootNotFoundSnafu { path: root }.fail();
    }

    debug!("Discovering entries below {}", root.display());
    let mut walker = WalkDir::new(&root).sort_by_file_name().into_iter();

    let mut tree: Option<PathTree> = None;
    while let Some(entry) = walker.next() {
        let entry = entry.context(WalkSnafu { root: root.clone() })?;
        let is_dir = entry.file_type().is_dir();

        if skip.matches(entry.path()) {
            debug!("Skipping {}", entry.path().display());
            if is_dir {
                walker.skip_current_dir();
            }
            match tree.as_mut() {
                Some(tree) => tree.record_skipped(entry.path()).context(InsertSnafu)?,
                None => return RootSkippedSnafu { path: root }.fail(),
            }
            continue;
        }
        trace!("Discovered {} (dir: {})", entry.path().display(), is_dir);

        match tree.as_mut() {
            Some(tree) => {
                tree.insert(entry.path(), is_dir).context(InsertSnafu)?;
            }
            None => tree = Some(PathTree::new(entry.path(), is_dir)),
        }
    }

    let tree = tree.context(RootSkippedSnafu { path: root })?;
    debug!("Discovered {} entries", tree.len());
    Ok(tree)
}

#[derive(Debug, Snafu)]
pub enum DiscoveryError {
    #[snafu(display("'{}' does not exist", path.display()))]
    RootNotFound { path: PathBuf },
    #[snafu(display("'{}' is excluded by the skip list", path.display()))]
    RootSkipped { path: PathBuf },
    #[snafu(display("Failed to access or list contents of '{}'", root.display()))]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[snafu(display("Failed to record a discovered entry"))]
    Insert { source: TreeError },
}
