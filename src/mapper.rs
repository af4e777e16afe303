use std::path::{Path, PathBuf};

/// Error raised when a path cannot be re-rooted under the mirror.
///
/// The watch supervisor only delivers events for paths under the registered
/// watch root, so hitting this in a running process indicates a wiring bug,
/// not an operator mistake.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("{path} is outside the watch root {watch_root}")]
    OutsideWatchRoot { path: PathBuf, watch_root: PathBuf },
}

/// Map an absolute path under `watch_root` to its counterpart under
/// `mirror_root`, preserving every remaining path segment.
///
/// Pure function — no filesystem access, never cached.
pub fn map_to_mirror(
    watch_root: &Path,
    mirror_root: &Path,
    path: &Path,
) -> Result<PathBuf, MapError> {
    let relative = path
        .strip_prefix(watch_root)
        .map_err(|_| MapError::OutsideWatchRoot {
            path: path.to_path_buf(),
            watch_root: watch_root.to_path_buf(),
        })?;
    Ok(mirror_root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_nested_path_under_mirror_root() {
        let mapped = map_to_mirror(
            Path::new("/src"),
            Path::new("/dst"),
            Path::new("/src/a/b.txt"),
        )
        .unwrap();
        assert_eq!(mapped, PathBuf::from("/dst/a/b.txt"));
    }

    #[test]
    fn test_watch_root_itself_maps_to_mirror_root() {
        let mapped =
            map_to_mirror(Path::new("/src"), Path::new("/dst"), Path::new("/src")).unwrap();
        assert_eq!(mapped, PathBuf::from("/dst"));
    }

    #[test]
    fn test_preserves_every_remaining_segment() {
        let mapped = map_to_mirror(
            Path::new("/watch/root"),
            Path::new("/mirror"),
            Path::new("/watch/root/deep/nested/tree/file.bin"),
        )
        .unwrap();
        assert_eq!(mapped, PathBuf::from("/mirror/deep/nested/tree/file.bin"));
    }

    #[test]
    fn test_rejects_path_outside_watch_root() {
        let err = map_to_mirror(
            Path::new("/src"),
            Path::new("/dst"),
            Path::new("/elsewhere/a.txt"),
        )
        .unwrap_err();
        assert!(matches!(err, MapError::OutsideWatchRoot { .. }));
    }

    #[test]
    fn test_rejects_sibling_with_shared_prefix_string() {
        // "/srcfoo" starts with the string "/src" but is not under it.
        let err = map_to_mirror(
            Path::new("/src"),
            Path::new("/dst"),
            Path::new("/srcfoo/a.txt"),
        )
        .unwrap_err();
        assert!(matches!(err, MapError::OutsideWatchRoot { .. }));
    }
}
