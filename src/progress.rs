//! Progress reporting for an in-flight scan.
//!
//! The walker publishes a snapshot into a shared, mutex-protected slot; the UI (or, in
//! this crate's non-interactive binary, the textual renderer) polls that slot on its own
//! cadence. This is a snapshot-polling model, not a channel/stream: the walker never
//! blocks on a reader being present, and a slow or absent reader never backs up work.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A point-in-time view of scan progress.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub items_counted: u64,
    pub current_item_name: Option<PathBuf>,
    pub done: bool,
}

/// Narrow interface the walker publishes progress through. Production code uses
/// [`SharedProgress`]; a UI or test can supply any other implementation.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, progress: Progress);
}

/// Default [`ProgressSink`]: a `Mutex`-guarded snapshot, read via [`SharedProgress::snapshot`].
#[derive(Debug, Default)]
pub struct SharedProgress {
    inner: Mutex<Progress>,
}

impl SharedProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(SharedProgress {
            inner: Mutex::new(Progress::default()),
        })
    }

    /// Reads the most recently published snapshot.
    pub fn snapshot(&self) -> Progress {
        self.inner.lock().unwrap().clone()
    }
}

impl ProgressSink for SharedProgress {
    fn publish(&self, progress: Progress) {
        *self.inner.lock().unwrap() = progress;
    }
}

/// A [`ProgressSink`] that discards every update; used when `--no-progress` is set or a
/// caller doesn't care about progress at all.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn publish(&self, _progress: Progress) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_progress_starts_at_default() {
        let sink = SharedProgress::new();
        let snap = sink.snapshot();
        assert_eq!(snap.items_counted, 0);
        assert!(!snap.done);
    }

    #[test]
    fn publish_then_snapshot_round_trips() {
        let sink = SharedProgress::new();
        sink.publish(Progress {
            items_counted: 42,
            current_item_name: Some(PathBuf::from("/tmp/foo")),
            done: false,
        });
        let snap = sink.snapshot();
        assert_eq!(snap.items_counted, 42);
        assert_eq!(snap.current_item_name, Some(PathBuf::from("/tmp/foo")));
    }

    #[test]
    fn last_publish_wins() {
        let sink = SharedProgress::new();
        sink.publish(Progress {
            items_counted: 1,
            ..Default::default()
        });
        sink.publish(Progress {
            items_counted: 2,
            done: true,
            ..Default::default()
        });
        let snap = sink.snapshot();
        assert_eq!(snap.items_counted, 2);
        assert!(snap.done);
    }

    #[test]
    fn null_progress_accepts_updates_without_panicking() {
        let sink = NullProgress;
        sink.publish(Progress {
            items_counted: 5,
            ..Default::default()
        });
    }
}
