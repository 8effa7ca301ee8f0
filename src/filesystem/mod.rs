//! Filesystem side of the crate.
//!
//! [`PathTree`] mirrors the subtree that is being sanitized, [`discover`]
//! fills it from disk and [`Renamer`] is the single capability the rename
//! pass needs to touch the real filesystem.

mod discovery;
mod rename;
mod tree;

pub use discovery::{DiscoveryError, SkipSet, discover};
pub use rename::{FsRenamer, Renamer};
pub use tree::{NodeId, PathTree, TreeError};
