use std::path::{Path, PathBuf};

/// Normalized filesystem change, one case per kind.
///
/// Variants carry paths only: whether the source is a file or a directory is
/// observed live by the sync engine at handling time, because the watched
/// entry may change (or vanish) between OS notification and processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// An entry appeared under the watch root.
    Created { path: PathBuf },
    /// An entry's contents changed.
    Modified { path: PathBuf },
    /// An entry disappeared from the watch root.
    Deleted { path: PathBuf },
    /// An entry was renamed or moved within the watch root.
    Moved { from: PathBuf, to: PathBuf },
}

impl ChangeEvent {
    /// Event kind label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Modified { .. } => "modified",
            Self::Deleted { .. } => "deleted",
            Self::Moved { .. } => "moved",
        }
    }

    /// The path the event originated at (the old path for a move).
    pub fn source_path(&self) -> &Path {
        match self {
            Self::Created { path } | Self::Modified { path } | Self::Deleted { path } => path,
            Self::Moved { from, .. } => from,
        }
    }
}
