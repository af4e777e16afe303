//! Watch supervisor: one OS watcher and one worker loop per watch pair.
//!
//! Each pair gets its own raw (undebounced) `notify` watcher, its own
//! channel, and its own dedicated thread running its own [`SyncEngine`].
//! Pairs share no mutable state; a slow copy in one pair never stalls
//! another. Raw events are used instead of a debouncer because debouncing
//! collapses rename pairs into bare path notifications, which would destroy
//! `Moved { from, to }` semantics.

pub mod event;

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{error, warn};

use crate::config::WatchPair;
use crate::engine::SyncEngine;
use event::ChangeEvent;

/// Handle to a running watch loop.
///
/// Keep alive: dropping the inner watcher stops OS notifications and closes
/// the channel, which lets the worker drain and exit.
pub struct WatcherHandle {
    watcher: RecommendedWatcher,
    worker: thread::JoinHandle<()>,
}

impl WatcherHandle {
    /// Stop accepting OS notifications, then block until the worker has
    /// processed every event already queued. No in-flight event is
    /// abandoned.
    pub fn drain(self) {
        drop(self.watcher);
        if self.worker.join().is_err() {
            error!("watch worker panicked during drain");
        }
    }
}

/// Start watching one pair: recursive OS watcher plus a worker thread that
/// feeds normalized events to the pair's own [`SyncEngine`].
pub fn start_pair(pair: WatchPair) -> anyhow::Result<WatcherHandle> {
    let (tx, rx) = mpsc::channel::<Event>();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) => {
                // Receiver gone means we are shutting down.
                let _ = tx.send(event);
            }
            Err(err) => warn!(error = %err, "watch backend error"),
        }
    })?;
    watcher.watch(&pair.watch_root, RecursiveMode::Recursive)?;

    let thread_name = format!(
        "mirror-{}",
        pair.watch_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string())
    );

    let engine = SyncEngine::new(pair);
    let worker = thread::Builder::new().name(thread_name).spawn(move || {
        while let Ok(raw) = rx.recv() {
            for change in normalize(raw) {
                if let Err(err) = engine.apply(&change) {
                    // Log with full context and keep the loop alive; a
                    // failed copy must never take the watcher down.
                    error!(
                        event = change.kind(),
                        source = %change.source_path().display(),
                        watch_root = %engine.pair().watch_root.display(),
                        error = %err,
                        "failed to mirror change",
                    );
                }
            }
        }
    })?;

    Ok(WatcherHandle { watcher, worker })
}

/// Translate one raw `notify` event into zero or more normalized changes.
///
/// Rename halves reported separately (entry moved across the watch
/// boundary) compose from the primitives: `From` becomes a delete, `To`
/// becomes a create. Rename events of unknown direction fall back to an
/// existence check.
fn normalize(event: Event) -> Vec<ChangeEvent> {
    match event.kind {
        EventKind::Create(_) => paths_to(event.paths, |path| ChangeEvent::Created { path }),
        EventKind::Remove(_) => paths_to(event.paths, |path| ChangeEvent::Deleted { path }),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            if let [from, to] = &event.paths[..] {
                vec![ChangeEvent::Moved {
                    from: from.clone(),
                    to: to.clone(),
                }]
            } else {
                classify_by_existence(event.paths)
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths_to(event.paths, |path| ChangeEvent::Deleted { path })
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths_to(event.paths, |path| ChangeEvent::Created { path })
        }
        EventKind::Modify(ModifyKind::Name(_)) => classify_by_existence(event.paths),
        EventKind::Modify(_) => paths_to(event.paths, |path| ChangeEvent::Modified { path }),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}

fn paths_to(paths: Vec<PathBuf>, make: impl Fn(PathBuf) -> ChangeEvent) -> Vec<ChangeEvent> {
    paths.into_iter().map(make).collect()
}

/// Last-resort classification when the backend reports a rename without
/// direction: an existing path was created (or renamed into place), a
/// missing one was deleted.
fn classify_by_existence(paths: Vec<PathBuf>) -> Vec<ChangeEvent> {
    paths
        .into_iter()
        .map(|path| {
            if path.exists() {
                ChangeEvent::Created { path }
            } else {
                ChangeEvent::Deleted { path }
            }
        })
        .collect()
}
