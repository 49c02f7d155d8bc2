//! Parallel recursive directory walker.
//!
//! Each directory opens its own `rayon::scope` over its children: a child directory is
//! handed to `scope.spawn` when a permit is available from a bounded, `try_acquire`-only
//! [`Semaphore`], or descended into inline on the current thread otherwise. Because the
//! semaphore never blocks, a worker that can't get a permit simply keeps recursing in its
//! own stack frame instead of queuing — there is no deadlock window, even at maximum
//! fan-out. This generalizes the teacher's flat `rayon`-backed metadata collection
//! (`traversal.rs`) into a bounded, recursive directory-scan pool.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::entry::{EntryData, Tree};
use crate::error::ScanError;
use crate::progress::{Progress, ProgressSink};
use crate::sort::IgnoreSet;
use crate::stat::{EntryKind, Stat, ALLOC_UNIT};

/// A counting semaphore with a non-blocking `try_acquire` only — there is deliberately no
/// blocking `acquire`, since a worker that can't get a permit must fall back to scanning
/// inline rather than waiting.
struct Semaphore {
    permits: Mutex<usize>,
}

impl Semaphore {
    fn new(permits: usize) -> Self {
        Semaphore {
            permits: Mutex::new(permits),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock().unwrap();
        if *permits > 0 {
            *permits -= 1;
            true
        } else {
            false
        }
    }

    fn release(&self) {
        *self.permits.lock().unwrap() += 1;
    }
}

/// Options controlling a single scan. Not shared across scans — in particular the
/// hard-link registry lives in [`ScanState`], created fresh per `analyze` call.
pub struct WalkOptions {
    pub ignore: IgnoreSet,
    /// If false, descending into a directory on a different device than the scan root is
    /// refused; the mount point itself is still recorded as a leaf entry.
    pub cross_device: bool,
    pub cancel: Arc<std::sync::atomic::AtomicBool>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        WalkOptions {
            ignore: IgnoreSet::new(),
            cross_device: true,
            cancel: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }
}

/// Returns a sensible default permit count: the number of logical CPUs, or 4 if that
/// can't be determined.
pub fn default_permits() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Intermediate tree shape produced by a scan before it is attached to a [`Tree`]'s
/// arena. Kept separate from the arena so that parallel tasks never need shared mutable
/// access to it — each subtree is assembled locally and handed up to its parent.
struct ScanNode {
    data: EntryData,
    children: Vec<ScanNode>,
}

/// Per-scan mutable state: the hard-link registry and progress accounting. Recreated for
/// every `analyze` call, per the "created per-scan, not process-global" requirement.
struct ScanState {
    hardlinks: Mutex<HashSet<(u64, u64)>>,
    items_counted: AtomicU64,
    progress: Arc<dyn ProgressSink>,
}

impl ScanState {
    fn new(progress: Arc<dyn ProgressSink>) -> Self {
        ScanState {
            hardlinks: Mutex::new(HashSet::new()),
            items_counted: AtomicU64::new(0),
            progress,
        }
    }

    fn record(&self, path: &Path) {
        let count = self.items_counted.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress.publish(Progress {
            items_counted: count,
            current_item_name: Some(path.to_path_buf()),
            done: false,
        });
    }

    fn finish(&self) {
        self.progress.publish(Progress {
            items_counted: self.items_counted.load(Ordering::Relaxed),
            current_item_name: None,
            done: true,
        });
    }
}

/// Drives a parallel scan of a filesystem subtree, producing a [`Tree`] of aggregated
/// statistics. Generic over [`Stat`] so tests can substitute an in-memory filesystem.
pub struct Walker<S: Stat> {
    stat: S,
    semaphore: Semaphore,
}

impl<S: Stat> Walker<S> {
    pub fn new(stat: S, permits: usize) -> Self {
        Walker {
            stat,
            semaphore: Semaphore::new(permits.max(1)),
        }
    }

    /// Scans `root`, returning the aggregated tree. `progress` receives periodic updates
    /// as entries are discovered; pass [`crate::progress::NullProgress`] to ignore them.
    pub fn analyze(
        &self,
        root: &Path,
        opts: &WalkOptions,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Tree, ScanError> {
        self.stat
            .lstat(root)
            .map_err(|_| ScanError::EntryUnreadable(root.to_path_buf()))?;

        let state = ScanState::new(progress);
        let name = entry_name(root);
        let out: Mutex<Vec<ScanNode>> = Mutex::new(Vec::new());

        self.scan_one(root.to_path_buf(), name, 0, true, opts, &state, &out);

        if opts.cancel.load(Ordering::Relaxed) {
            return Err(ScanError::Cancelled);
        }

        let mut nodes = out.into_inner().unwrap();
        let root_node = nodes
            .pop()
            .ok_or_else(|| ScanError::EntryUnreadable(root.to_path_buf()))?;

        let mut tree = Tree::new(root.to_path_buf(), root_node.data);
        let root_id = tree.root();
        attach_scan_nodes(&mut tree, root_id, root_node.children);
        tree.recompute_subtree(root_id);
        state.finish();
        Ok(tree)
    }

    fn scan_one(
        &self,
        path: PathBuf,
        name: String,
        root_dev: u64,
        is_root: bool,
        opts: &WalkOptions,
        state: &ScanState,
        out: &Mutex<Vec<ScanNode>>,
    ) {
        if opts.cancel.load(Ordering::Relaxed) {
            return;
        }

        let info = match self.stat.lstat(&path) {
            Ok(info) => info,
            Err(_) => {
                // Vanished mid-scan, or unreadable: flag and move on rather than
                // aborting the whole scan.
                let mut data = EntryData::new(name, EntryKind::Other);
                data.error_flag = true;
                out.lock().unwrap().push(ScanNode {
                    data,
                    children: Vec::new(),
                });
                return;
            }
        };

        state.record(&path);

        let effective_root_dev = if is_root { info.dev_id } else { root_dev };

        // A directory charges one allocation unit to its own apparent size, same as its
        // usage — only its children's bytes are purely additive on top of that.
        let self_apparent_size = if info.kind == EntryKind::Directory {
            ALLOC_UNIT
        } else {
            info.apparent_size
        };

        let mut data = EntryData::new(name, info.kind);
        data.set_self_stats(self_apparent_size, info.usage);
        data.dev_id = info.dev_id;
        data.inode = info.inode;
        data.mtime = info.mtime;

        if info.kind == EntryKind::File && info.nlink > 1 {
            let key = (info.dev_id, info.inode);
            if !state.hardlinks.lock().unwrap().insert(key) {
                // Already charged via an earlier link to the same inode.
                data.set_self_stats(0, 0);
            }
        }

        if info.kind == EntryKind::Directory && opts.ignore.is_ignored(&path) {
            // Ignored: omitted from the tree entirely, unlike the no-cross boundary
            // below, which still records a stub for the mount point it stops at.
            return;
        }

        let should_descend = info.kind == EntryKind::Directory
            && (is_root || opts.cross_device || info.dev_id == effective_root_dev);

        if !should_descend {
            out.lock().unwrap().push(ScanNode {
                data,
                children: Vec::new(),
            });
            return;
        }

        let names = match self.stat.read_dir(&path) {
            Ok(names) => names,
            Err(_) => {
                data.error_flag = true;
                out.lock().unwrap().push(ScanNode {
                    data,
                    children: Vec::new(),
                });
                return;
            }
        };

        let children_out: Mutex<Vec<ScanNode>> = Mutex::new(Vec::new());
        rayon::scope(|scope| {
            for child_name in names {
                if opts.cancel.load(Ordering::Relaxed) {
                    break;
                }
                let child_path = path.join(&child_name);
                let child_name_str = child_name.to_string_lossy().into_owned();

                if self.semaphore.try_acquire() {
                    scope.spawn(move |_| {
                        self.scan_one(
                            child_path,
                            child_name_str,
                            effective_root_dev,
                            false,
                            opts,
                            state,
                            &children_out,
                        );
                        self.semaphore.release();
                    });
                } else {
                    // No permit available: descend inline on this thread. This is what
                    // guarantees forward progress without a blocking acquire.
                    self.scan_one(
                        child_path,
                        child_name_str,
                        effective_root_dev,
                        false,
                        opts,
                        state,
                        &children_out,
                    );
                }
            }
        });

        out.lock().unwrap().push(ScanNode {
            data,
            children: children_out.into_inner().unwrap(),
        });
    }
}

fn attach_scan_nodes(tree: &mut Tree, parent: indextree::NodeId, nodes: Vec<ScanNode>) {
    for node in nodes {
        let id = tree.push_child(parent, node.data);
        attach_scan_nodes(tree, id, node.children);
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("file_a.txt"), "hello").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/file_b.txt"), "0123456789").unwrap();
        fs::create_dir(root.join("subdir/nested")).unwrap();
        fs::write(
            root.join("subdir/nested/file_c.txt"),
            "01234567890123456789",
        )
        .unwrap();
        tmp
    }

    fn real_walker() -> Walker<crate::stat::RealStat> {
        Walker::new(crate::stat::RealStat, default_permits())
    }

    #[test]
    fn analyze_visits_every_entry() {
        let tmp = create_test_tree();
        let walker = real_walker();
        let opts = WalkOptions::default();
        let tree = walker
            .analyze(tmp.path(), &opts, Arc::new(NullProgress))
            .unwrap();

        fn count(tree: &Tree, node: indextree::NodeId) -> usize {
            1 + tree
                .children(node)
                .into_iter()
                .map(|c| count(tree, c))
                .sum::<usize>()
        }

        assert_eq!(count(&tree, tree.root()), 6);
    }

    #[test]
    fn analyze_aggregates_sizes_up_to_root() {
        let tmp = create_test_tree();
        let walker = real_walker();
        let opts = WalkOptions::default();
        let tree = walker
            .analyze(tmp.path(), &opts, Arc::new(NullProgress))
            .unwrap();

        let root = tree.get(tree.root());
        assert!(root.apparent_size >= 5 + 10 + 20);
        assert_eq!(root.item_count, 6);
    }

    #[test]
    fn analyze_nonexistent_path_is_entry_unreadable() {
        let walker = real_walker();
        let opts = WalkOptions::default();
        let result = walker.analyze(
            Path::new("/nonexistent/path/that/does/not/exist"),
            &opts,
            Arc::new(NullProgress),
        );
        assert!(matches!(result, Err(ScanError::EntryUnreadable(_))));
    }

    #[test]
    fn analyze_respects_ignore_set() {
        let tmp = create_test_tree();
        let mut opts = WalkOptions::default();
        opts.ignore.add(tmp.path().join("subdir"));
        let walker = real_walker();
        let tree = walker
            .analyze(tmp.path(), &opts, Arc::new(NullProgress))
            .unwrap();

        let names: Vec<String> = tree
            .children(tree.root())
            .into_iter()
            .map(|id| tree.get(id).name.clone())
            .collect();
        // Ignored means omitted from the tree entirely, not merely left un-descended.
        assert!(!names.contains(&"subdir".to_string()));
        assert_eq!(tree.get(tree.root()).item_count, 2); // root + file_a.txt
    }

    #[test]
    fn analyze_cancelled_before_start_returns_cancelled() {
        let tmp = create_test_tree();
        let mut opts = WalkOptions::default();
        opts.cancel.store(true, Ordering::Relaxed);
        let walker = real_walker();
        let result = walker.analyze(tmp.path(), &opts, Arc::new(NullProgress));
        assert!(matches!(result, Err(ScanError::Cancelled)));
    }

    #[test]
    fn analyze_single_file_root() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("solo.txt");
        fs::write(&file, "data").unwrap();
        let walker = real_walker();
        let opts = WalkOptions::default();
        let tree = walker.analyze(&file, &opts, Arc::new(NullProgress)).unwrap();
        assert_eq!(tree.get(tree.root()).kind, EntryKind::File);
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn semaphore_try_acquire_respects_capacity() {
        let sem = Semaphore::new(1);
        assert!(sem.try_acquire());
        assert!(!sem.try_acquire());
        sem.release();
        assert!(sem.try_acquire());
    }
}
