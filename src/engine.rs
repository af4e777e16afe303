//! The change→action state machine.
//!
//! Every branch is decided from the mirror-side state observed at call time,
//! never from an assumption that the mirror is already consistent — the
//! mirror may have drifted after a restart or a failed event. That makes
//! each transition independently idempotent: replaying an event twice leaves
//! the mirror exactly where replaying it once did.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::actions::{self, ActionError, ActionOutcome};
use crate::config::WatchPair;
use crate::mapper::{self, MapError};
use crate::watcher::event::ChangeEvent;

/// Failure while applying a single change event.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Applies change events for one watch pair.
///
/// Holds no state between events beyond the immutable pair; all decisions
/// are re-derived from the live filesystem.
pub struct SyncEngine {
    pair: WatchPair,
}

impl SyncEngine {
    pub fn new(pair: WatchPair) -> Self {
        Self { pair }
    }

    pub fn pair(&self) -> &WatchPair {
        &self.pair
    }

    /// Apply one event to the mirror.
    ///
    /// Errors are returned, not retried; the watch loop logs them and keeps
    /// going, so one failed copy never takes the loop down.
    pub fn apply(&self, event: &ChangeEvent) -> Result<(), EngineError> {
        match event {
            ChangeEvent::Created { path } | ChangeEvent::Modified { path } => {
                self.apply_upsert(event.kind(), path)
            }
            ChangeEvent::Deleted { path } => self.apply_delete(path),
            ChangeEvent::Moved { from, to } => self.apply_move(from, to),
        }
    }

    fn map(&self, path: &Path) -> Result<PathBuf, MapError> {
        mapper::map_to_mirror(&self.pair.watch_root, &self.pair.mirror_root, path)
    }

    /// Created and Modified share one handler: both unconditionally bring
    /// the mirror entry up to date, which is what makes a Modified arriving
    /// before its Created still converge.
    fn apply_upsert(&self, kind: &'static str, source: &Path) -> Result<(), EngineError> {
        let target = self.map(source)?;

        if source.is_file() {
            if let Some(parent) = target.parent() {
                actions::ensure_dir(parent)?;
            }
            actions::copy_file(source, &target)?;
            info!(
                event = kind,
                source = %source.display(),
                target = %target.display(),
                "copied file",
            );
        } else if source.is_dir() {
            match actions::ensure_dir(&target)? {
                ActionOutcome::Applied => info!(
                    event = kind,
                    source = %source.display(),
                    target = %target.display(),
                    "created directory",
                ),
                ActionOutcome::Noop => debug!(
                    event = kind,
                    target = %target.display(),
                    "directory already mirrored",
                ),
            }
        } else {
            // Source vanished between notification and handling.
            debug!(
                event = kind,
                source = %source.display(),
                "source gone before handling, skipping",
            );
        }

        Ok(())
    }

    fn apply_delete(&self, source: &Path) -> Result<(), EngineError> {
        let target = self.map(source)?;

        let outcome = if target.is_dir() {
            actions::remove_tree(&target)?
        } else {
            actions::remove_file(&target)?
        };

        match outcome {
            ActionOutcome::Applied => info!(
                event = "deleted",
                source = %source.display(),
                target = %target.display(),
                "removed mirror entry",
            ),
            ActionOutcome::Noop => debug!(
                event = "deleted",
                target = %target.display(),
                "mirror entry already absent",
            ),
        }

        Ok(())
    }

    /// A moved directory only gets its directory entry recreated at the new
    /// location; contents beneath it are not re-copied. Only files observed
    /// as Created/Modified ever get their bytes copied.
    fn apply_move(&self, from: &Path, to: &Path) -> Result<(), EngineError> {
        let old_target = self.map(from)?;
        let new_target = self.map(to)?;

        if old_target.is_file() {
            actions::remove_file(&old_target)?;
            actions::copy_file(to, &new_target)?;
        } else if old_target.is_dir() {
            actions::remove_tree(&old_target)?;
            actions::ensure_dir(&new_target)?;
        } else if to.is_file() {
            // Stale mirror: the old entry was never there. Still land the
            // moved entity at its new location.
            actions::copy_file(to, &new_target)?;
        } else if to.is_dir() {
            actions::ensure_dir(&new_target)?;
        } else {
            debug!(
                event = "moved",
                source = %from.display(),
                "neither mirror entry nor destination present, skipping",
            );
            return Ok(());
        }

        info!(
            event = "moved",
            source = %from.display(),
            destination = %to.display(),
            target = %new_target.display(),
            "relocated mirror entry",
        );

        Ok(())
    }
}
