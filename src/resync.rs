//! One-shot full-tree replay of a watch root into its mirror.
//!
//! There is no automatic retry after a failed event, so after inspecting
//! the log an operator runs `dirmirror resync` to bring a drifted mirror
//! back into line. The walk visits every descendant — a mirror must not
//! honor gitignore or hidden-file rules.

use std::path::Path;

use tracing::{info, warn};

use crate::actions;
use crate::config::WatchPair;
use crate::mapper;

/// Counts of what a resync pass did to one mirror.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResyncReport {
    pub files_copied: usize,
    pub dirs_created: usize,
    pub failures: usize,
}

/// Walk the pair's watch tree and replay it into the mirror with the same
/// idempotent primitives the sync engine uses. Per-path failures are logged
/// and skipped, matching the engine's log-and-continue policy.
pub fn resync_pair(pair: &WatchPair) -> ResyncReport {
    let mut report = ResyncReport::default();

    let walker = ignore::WalkBuilder::new(&pair.watch_root)
        .standard_filters(false)
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "failed to read directory entry");
                report.failures += 1;
                continue;
            }
        };

        let source = entry.path();
        if source == pair.watch_root {
            continue;
        }

        if let Err(err) = replay_path(pair, source, &mut report) {
            warn!(
                source = %source.display(),
                watch_root = %pair.watch_root.display(),
                error = %err,
                "failed to resync path",
            );
            report.failures += 1;
        }
    }

    info!(
        watch_root = %pair.watch_root.display(),
        mirror_root = %pair.mirror_root.display(),
        files_copied = report.files_copied,
        dirs_created = report.dirs_created,
        failures = report.failures,
        "resync pass complete",
    );

    report
}

fn replay_path(
    pair: &WatchPair,
    source: &Path,
    report: &mut ResyncReport,
) -> anyhow::Result<()> {
    let target = mapper::map_to_mirror(&pair.watch_root, &pair.mirror_root, source)?;

    if source.is_dir() {
        if actions::ensure_dir(&target)? == actions::ActionOutcome::Applied {
            report.dirs_created += 1;
        }
    } else if source.is_file() {
        if let Some(parent) = target.parent() {
            actions::ensure_dir(parent)?;
        }
        actions::copy_file(source, &target)?;
        report.files_copied += 1;
    }
    // Sockets, fifos and the like are skipped.

    Ok(())
}
