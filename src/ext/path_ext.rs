use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path without touching the filesystem.
///
/// `.` segments are dropped and `..` segments cancel the preceding normal
/// segment. Leading `..` segments of a relative path are kept, and `..`
/// directly below the filesystem root is dropped. An empty result becomes `.`.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

pub trait PathExt {
    fn clean(&self) -> PathBuf;
}

impl PathExt for Path {
    fn clean(&self) -> PathBuf {
        lexical_clean(self)
    }
}

impl PathExt for PathBuf {
    fn clean(&self) -> PathBuf {
        lexical_clean(self)
    }
}
