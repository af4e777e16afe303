//! Idempotent mirror-side filesystem primitives.
//!
//! Every primitive reports whether it actually mutated the mirror
//! ([`ActionOutcome::Applied`]) or found the desired state already in place
//! ([`ActionOutcome::Noop`]). Failures are typed rather than raised, so the
//! sync engine's log-and-continue policy lives in the signature, not in a
//! catch block.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Result of a mirror action that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The mirror was mutated.
    Applied,
    /// The mirror was already in the desired state.
    Noop,
}

/// Errors from mirror actions.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} exists but is a regular file, not a directory")]
    NotADirectory { path: PathBuf },

    #[error("{path} exists as a directory; refusing to overwrite it with a file")]
    IsADirectory { path: PathBuf },
}

impl ActionError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Create `path` and all missing ancestors.
///
/// No-op if `path` already exists as a directory. Fails with
/// [`ActionError::NotADirectory`] if a regular file occupies `path`.
pub fn ensure_dir(path: &Path) -> Result<ActionOutcome, ActionError> {
    if path.is_dir() {
        return Ok(ActionOutcome::Noop);
    }
    if path.is_file() {
        return Err(ActionError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    fs::create_dir_all(path).map_err(|e| ActionError::io(path, e))?;
    Ok(ActionOutcome::Applied)
}

/// Copy `source` to `target`, carrying over the modification time.
///
/// Overwrites an existing file at `target` unconditionally. Fails with
/// [`ActionError::IsADirectory`] if `target` exists as a directory; the
/// caller must remove it first.
pub fn copy_file(source: &Path, target: &Path) -> Result<ActionOutcome, ActionError> {
    if target.is_dir() {
        return Err(ActionError::IsADirectory {
            path: target.to_path_buf(),
        });
    }

    fs::copy(source, target).map_err(|e| ActionError::io(source, e))?;

    // fs::copy carries permissions; mtime has to be re-applied by hand.
    let mtime = fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(|e| ActionError::io(source, e))?;
    let target_file = fs::OpenOptions::new()
        .write(true)
        .open(target)
        .map_err(|e| ActionError::io(target, e))?;
    target_file
        .set_modified(mtime)
        .map_err(|e| ActionError::io(target, e))?;

    Ok(ActionOutcome::Applied)
}

/// Delete the file at `path` if present; no-op if absent.
pub fn remove_file(path: &Path) -> Result<ActionOutcome, ActionError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(ActionOutcome::Applied),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ActionOutcome::Noop),
        Err(e) => Err(ActionError::io(path, e)),
    }
}

/// Recursively delete the directory at `path` if present; no-op if absent.
pub fn remove_tree(path: &Path) -> Result<ActionOutcome, ActionError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(ActionOutcome::Applied),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ActionOutcome::Noop),
        Err(e) => Err(ActionError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    #[test]
    fn test_ensure_dir_creates_missing_ancestors() {
        let dir = tmp();
        let target = dir.path().join("a/b/c");

        let outcome = ensure_dir(&target).unwrap();

        assert_eq!(outcome, ActionOutcome::Applied);
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_dir_is_noop_on_existing_directory() {
        let dir = tmp();
        let outcome = ensure_dir(dir.path()).unwrap();
        assert_eq!(outcome, ActionOutcome::Noop);
    }

    #[test]
    fn test_ensure_dir_rejects_file_in_the_way() {
        let dir = tmp();
        let file = dir.path().join("occupied");
        fs::write(&file, "x").unwrap();

        let err = ensure_dir(&file).unwrap_err();
        assert!(matches!(err, ActionError::NotADirectory { .. }));
    }

    #[test]
    fn test_copy_file_overwrites_existing_target() {
        let dir = tmp();
        let source = dir.path().join("src.txt");
        let target = dir.path().join("dst.txt");
        fs::write(&source, "new contents").unwrap();
        fs::write(&target, "old contents").unwrap();

        let outcome = copy_file(&source, &target).unwrap();

        assert_eq!(outcome, ActionOutcome::Applied);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new contents");
    }

    #[test]
    fn test_copy_file_preserves_modification_time() {
        let dir = tmp();
        let source = dir.path().join("src.txt");
        let target = dir.path().join("dst.txt");
        fs::write(&source, "data").unwrap();

        // Push the source mtime well into the past so the copy can't pass by luck.
        let past = SystemTime::now() - Duration::from_secs(86_400);
        fs::OpenOptions::new()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(past)
            .unwrap();

        copy_file(&source, &target).unwrap();

        let source_mtime = fs::metadata(&source).unwrap().modified().unwrap();
        let target_mtime = fs::metadata(&target).unwrap().modified().unwrap();
        assert_eq!(source_mtime, target_mtime);
    }

    #[test]
    fn test_copy_file_rejects_directory_target() {
        let dir = tmp();
        let source = dir.path().join("src.txt");
        let target = dir.path().join("dst");
        fs::write(&source, "data").unwrap();
        fs::create_dir(&target).unwrap();

        let err = copy_file(&source, &target).unwrap_err();
        assert!(matches!(err, ActionError::IsADirectory { .. }));
    }

    #[test]
    fn test_remove_file_deletes_and_then_noops() {
        let dir = tmp();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();

        assert_eq!(remove_file(&file).unwrap(), ActionOutcome::Applied);
        assert!(!file.exists());
        assert_eq!(remove_file(&file).unwrap(), ActionOutcome::Noop);
    }

    #[test]
    fn test_remove_tree_deletes_recursively_and_then_noops() {
        let dir = tmp();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("nested/f.txt"), "x").unwrap();

        assert_eq!(remove_tree(&root).unwrap(), ActionOutcome::Applied);
        assert!(!root.exists());
        assert_eq!(remove_tree(&root).unwrap(), ActionOutcome::Noop);
    }
}
