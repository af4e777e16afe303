//! Configuration loading and watch-pair resolution.
//!
//! The config document carries two parallel, equal-length arrays paired by
//! index: the i-th watch folder mirrors into the i-th target folder. Both
//! TOML and JSON documents are accepted, chosen by file extension.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One watch-folder → target-folder pairing, resolved to absolute paths.
///
/// Built once at startup and immutable for the process lifetime. Each pair
/// gets its own watcher, its own worker, and its own sync engine — no state
/// is shared across pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPair {
    pub watch_root: PathBuf,
    pub mirror_root: PathBuf,
}

/// Raw configuration document, as deserialized from disk.
#[derive(Debug, Deserialize)]
pub struct MirrorConfig {
    pub watch_folders: Vec<PathBuf>,
    pub target_folders: Vec<PathBuf>,
}

/// Fatal configuration errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {format} config at {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("unsupported config format {extension:?} (expected .toml or .json)")]
    UnsupportedFormat { extension: String },

    #[error("watch_folders has {watch} entries but target_folders has {target}")]
    LengthMismatch { watch: usize, target: usize },

    #[error("configuration lists no folder pairs")]
    Empty,

    #[error("watch folder {path} is not an accessible directory: {source}")]
    BadWatchRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to prepare target folder {path}: {source}")]
    BadMirrorRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("watch folder and target folder resolve to the same path: {path}")]
    IdenticalRoots { path: PathBuf },
}

impl MirrorConfig {
    /// Load the configuration document at `path`, dispatching on extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match extension.as_str() {
            "toml" => toml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                format: "TOML",
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                format: "JSON",
                message: e.to_string(),
            }),
            _ => Err(ConfigError::UnsupportedFormat { extension }),
        }
    }

    /// Validate the parallel arrays and resolve them into [`WatchPair`]s.
    ///
    /// Watch folders must already exist; target folders (and their missing
    /// ancestors) are created here, before any watching begins. Both sides
    /// are canonicalized so every later path computation works on stable
    /// absolute roots.
    pub fn into_pairs(self) -> Result<Vec<WatchPair>, ConfigError> {
        if self.watch_folders.len() != self.target_folders.len() {
            return Err(ConfigError::LengthMismatch {
                watch: self.watch_folders.len(),
                target: self.target_folders.len(),
            });
        }
        if self.watch_folders.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut pairs = Vec::with_capacity(self.watch_folders.len());
        for (watch, target) in self.watch_folders.into_iter().zip(self.target_folders) {
            let watch_root = watch.canonicalize().map_err(|e| ConfigError::BadWatchRoot {
                path: watch.clone(),
                source: e,
            })?;
            if !watch_root.is_dir() {
                return Err(ConfigError::BadWatchRoot {
                    path: watch,
                    source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
                });
            }

            fs::create_dir_all(&target).map_err(|e| ConfigError::BadMirrorRoot {
                path: target.clone(),
                source: e,
            })?;
            let mirror_root = target
                .canonicalize()
                .map_err(|e| ConfigError::BadMirrorRoot {
                    path: target.clone(),
                    source: e,
                })?;

            if watch_root == mirror_root {
                return Err(ConfigError::IdenticalRoots { path: watch_root });
            }

            pairs.push(WatchPair {
                watch_root,
                mirror_root,
            });
        }

        Ok(pairs)
    }
}

/// Load and fully resolve the watch pairs in one step.
pub fn load_pairs(path: &Path) -> Result<Vec<WatchPair>, ConfigError> {
    MirrorConfig::load(path)?.into_pairs()
}
