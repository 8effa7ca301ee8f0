use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use derive_more::Display;
use snafu::{OptionExt, Snafu};

use crate::ext::PathExt;

/// Index of a node inside a [`PathTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct NodeId(usize);

/// One file or directory of the mirrored subtree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Current basename. Starts out as the original basename and is rewritten
    /// by the rename pass.
    name: String,
    /// Basename as found on disk, kept as raw bytes so that names which are not
    /// valid UTF-8 still resolve to the right file.
    original_name: OsString,
    original_path: PathBuf,
    is_dir: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Basenames of children left out of the tree. They still occupy their
    /// names on disk.
    skipped_children: Vec<String>,
}

impl Node {
    fn new(
        original_name: OsString,
        original_path: PathBuf,
        is_dir: bool,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            name: original_name.to_string_lossy().into_owned(),
            original_name,
            original_path,
            is_dir,
            parent,
            children: Vec::new(),
            skipped_children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn original_name(&self) -> &OsStr {
        &self.original_name
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A root such as `/`, `.` or `..` has no basename of its own and is never
    /// renamed.
    pub fn is_anchor(&self) -> bool {
        self.parent.is_none() && self.original_name.is_empty()
    }

    /// Path segment contributed by this node to its current path.
    ///
    /// While the name still matches the original one the raw on-disk bytes are
    /// used instead of the lossy UTF-8 rendition.
    fn segment(&self) -> &OsStr {
        if self.original_name.to_string_lossy() == self.name.as_str() {
            &self.original_name
        } else {
            OsStr::new(&self.name)
        }
    }
}

/// In-memory mirror of a filesystem subtree.
///
/// All nodes live in one vector owned by the tree, the root always at index 0.
/// Parent links are plain indices, so renaming a node implicitly moves every
/// descendant: current paths are recomputed from the chain of current names
/// whenever they are asked for.
#[derive(Debug, Clone)]
pub struct PathTree {
    nodes: Vec<Node>,
    /// Directory the root lives in, as given by the caller.
    root_dir: PathBuf,
}

impl PathTree {
    pub fn new(root_path: impl AsRef<Path>, is_dir: bool) -> Self {
        let root_path = root_path.as_ref().clean();
        let (root_dir, original_name) = match root_path.file_name() {
            Some(name) => (
                root_path.parent().map(Path::to_path_buf).unwrap_or_default(),
                name.to_os_string(),
            ),
            None => (root_path.clone(), OsString::new()),
        };

        Self {
            nodes: vec![Node::new(original_name, root_path, is_dir, None)],
            root_dir,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.node(id).parent.is_none()
    }

    pub fn has_parent(&self, id: NodeId) -> bool {
        !self.is_root(id)
    }

    /// Adds `path` to the tree, creating every missing node along the way.
    ///
    /// Nodes created only because something deeper was inserted are
    /// directories; the terminal node takes `is_dir`. Inserting a path that
    /// already exists returns the existing node unchanged.
    pub fn insert(&mut self, path: impl AsRef<Path>, is_dir: bool) -> Result<NodeId, TreeError> {
        let path = path.as_ref();
        let relative = self.relative_to_root(path)?;
        let segments = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment),
                _ => None,
            })
            .collect::<Vec<_>>();

        let mut current = self.root();
        for (depth, segment) in segments.iter().enumerate() {
            if !self.node(current).is_dir {
                return ParentIsFileSnafu {
                    path: path.to_path_buf(),
                    file: self.node(current).original_path.clone(),
                }
                .fail();
            }
            let is_terminal = depth + 1 == segments.len();
            current = match self.find_child(current, segment) {
                Some(child) => child,
                None => self.add_child(current, segment, !is_terminal || is_dir),
            };
        }

        Ok(current)
    }

    fn relative_to_root(&self, path: &Path) -> Result<PathBuf, TreeError> {
        let cleaned = path.clean();
        let root_path = &self.node(self.root()).original_path;

        let relative = if root_path == Path::new(".") {
            let escapes = cleaned.is_absolute() || cleaned.starts_with("..");
            (!escapes).then(|| cleaned.clone())
        } else {
            cleaned.strip_prefix(root_path).ok().map(Path::to_path_buf)
        };

        relative.context(OutsideRootSnafu {
            path: cleaned,
            root: root_path.clone(),
        })
    }

    fn find_child(&self, parent: NodeId, original_name: &OsStr) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|child| self.node(*child).original_name.as_os_str() == original_name)
    }

    fn add_child(&mut self, parent: NodeId, original_name: &OsStr, is_dir: bool) -> NodeId {
        let original_path = self.node(parent).original_path.join(original_name);
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(
            original_name.to_os_string(),
            original_path,
            is_dir,
            Some(parent),
        ));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Remembers that `path` exists on disk but is not part of the tree, so
    /// that no sibling gets renamed onto it.
    pub fn record_skipped(&mut self, path: impl AsRef<Path>) -> Result<(), TreeError> {
        let path = path.as_ref().clean();
        let Some(name) = path.file_name() else {
            return Ok(());
        };
        let parent = self.insert(path.parent().unwrap_or(Path::new("")), true)?;
        self.nodes[parent.0]
            .skipped_children
            .push(name.to_string_lossy().into_owned());
        Ok(())
    }

    /// Sets the current name of a node. Descendants follow automatically.
    pub(crate) fn set_name(&mut self, id: NodeId, name: String) {
        self.nodes[id.0].name = name;
    }

    /// Path of the node as it is right now, taking every rename applied so far
    /// (to the node itself and to its ancestors) into account.
    pub fn current_path(&self, id: NodeId) -> PathBuf {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            segments.push(node.segment());
            cursor = node.parent;
        }

        let mut path = self.root_dir.clone();
        for segment in segments.into_iter().rev().filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    /// Where the node sits on disk right before its own rename: below the
    /// current path of its parent, still under its original basename.
    pub fn rename_source_path(&self, id: NodeId) -> PathBuf {
        let node = self.node(id);
        let mut path = match node.parent {
            Some(parent) => self.current_path(parent),
            None => self.root_dir.clone(),
        };
        if !node.original_name.is_empty() {
            path.push(&node.original_name);
        }
        path
    }

    pub fn siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .parent
            .map(|parent| self.node(parent).children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(move |sibling| *sibling != id)
    }

    /// Returns true if any sibling currently carries `candidate` as its name,
    /// skipped siblings included.
    pub fn has_sibling_named(&self, id: NodeId, candidate: &str) -> bool {
        let skipped = self
            .node(id)
            .parent
            .is_some_and(|parent| {
                self.node(parent)
                    .skipped_children
                    .iter()
                    .any(|name| name == candidate)
            });
        skipped
            || self
                .siblings(id)
                .any(|sibling| self.node(sibling).name == candidate)
    }

    /// All nodes depth first, every node before its children and children in
    /// insertion order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.pre_order()
            .into_iter()
            .map(|id| self.current_path(id))
            .collect()
    }

    /// Current paths in pre-order, directories marked with a `[d]` suffix.
    pub fn paths_decorated(&self) -> Vec<String> {
        self.pre_order()
            .into_iter()
            .map(|id| {
                let path = self.current_path(id).display().to_string();
                if self.node(id).is_dir {
                    format!("{path}[d]")
                } else {
                    path
                }
            })
            .collect()
    }
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display(
        "Path '{}' is not located below the tree root '{}'",
        path.display(),
        root.display()
    ))]
    OutsideRoot { path: PathBuf, root: PathBuf },
    #[snafu(display(
        "Cannot insert '{}' because '{}' is a file",
        path.display(),
        file.display()
    ))]
    ParentIsFile { path: PathBuf, file: PathBuf },
}
