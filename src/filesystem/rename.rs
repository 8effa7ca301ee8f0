use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

/// Moves a single filesystem entry.
pub trait Renamer {
    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`Renamer`] backed by the real filesystem.
///
/// Refuses to replace an existing destination: `std::fs::rename` would
/// silently overwrite a file there on Unix.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRenamer;

impl Renamer for FsRenamer {
    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        if to.symlink_metadata().is_ok() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("destination '{}' already exists", to.display()),
            ));
        }
        debug!("Renaming {} to {}", from.display(), to.display());
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn renames_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("Größe.mp3");
        let to = temp_dir.path().join("Groesse.mp3");
        fs::write(&from, b"content").expect("Failed to create file");

        FsRenamer.rename(&from, &to).expect("Rename failed");

        assert!(!from.exists());
        assert_eq!(fs::read(&to).expect("Failed to read file"), b"content");
    }

    #[test]
    fn refuses_to_overwrite_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("a");
        let to = temp_dir.path().join("b");
        fs::write(&from, b"from").expect("Failed to create file");
        fs::write(&to, b"to").expect("Failed to create file");

        let error = FsRenamer.rename(&from, &to).unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&to).expect("Failed to read file"), b"to");
    }

    #[test]
    fn reports_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = FsRenamer.rename(
            &temp_dir.path().join("missing"),
            &temp_dir.path().join("target"),
        );

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
