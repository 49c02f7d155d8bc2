//! Core data structures for representing filesystem entries.
//!
//! This module defines the arena-backed tree used to represent disk usage:
//! - [`EntryData`]: the per-node statistics stored in the arena
//! - [`EntryKind`]: file, directory, symlink, or other
//! - [`Tree`]: an [`indextree::Arena`] of [`EntryData`] plus a root handle, with the
//!   aggregation and mutation operations that keep its invariants intact
//!
//! # Tree Structure
//!
//! Nodes live in a single [`indextree::Arena`]; parent/child relationships are arena
//! linkage rather than owned fields, so there is no `Rc<RefCell<..>>` cycle and upward
//! walks (for aggregation, or for reconstructing a node's path) use `NodeId::ancestors`.

use std::cmp::Reverse;
use std::path::PathBuf;
use std::time::SystemTime;

use indextree::{Arena, NodeId};

pub use crate::stat::EntryKind;

/// Sort key for ordering a directory's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Usage,
    ApparentSize,
    Name,
    ItemCount,
    Mtime,
}

impl SortKey {
    /// Parses a CLI-facing sort key name. Returns `None` for unknown strings.
    pub fn parse(s: &str) -> Option<SortKey> {
        match s {
            "none" => None,
            "usage" | "size" => Some(SortKey::Usage),
            "apparent" | "apparent-size" => Some(SortKey::ApparentSize),
            "name" => Some(SortKey::Name),
            "items" | "item-count" => Some(SortKey::ItemCount),
            "mtime" => Some(SortKey::Mtime),
            _ => None,
        }
    }
}

/// Per-node statistics stored in the tree's arena.
///
/// No `parent` field is stored here: the arena already tracks parent linkage, and
/// [`Tree::path_of`] walks `NodeId::ancestors` to reconstruct a full path on demand.
#[derive(Debug, Clone)]
pub struct EntryData {
    pub name: String,
    pub kind: EntryKind,
    /// Intrinsic apparent size of this object alone: a file's length, or one
    /// allocation unit for a directory's own metadata (matching its `self_usage`).
    /// Set once by the walker and never mutated by aggregation — it is the base
    /// [`Tree::aggregate_up`] recomputes from.
    pub self_apparent_size: u64,
    /// Intrinsic on-disk usage of this object alone.
    pub self_usage: u64,
    /// Aggregated totals: for a directory, `self_*` plus every descendant's
    /// contribution; for a leaf, equal to `self_*`. Recomputed by
    /// [`Tree::aggregate_up`], never hand-edited elsewhere.
    pub apparent_size: u64,
    pub usage: u64,
    pub item_count: u64,
    pub mtime: SystemTime,
    pub dev_id: u64,
    pub inode: u64,
    /// Set when a child of this entry could not be read (permission denied, vanished
    /// mid-scan, or similar). The scan continues; this just flags the subtree as partial.
    pub error_flag: bool,
}

impl EntryData {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        EntryData {
            name: name.into(),
            kind,
            self_apparent_size: 0,
            self_usage: 0,
            apparent_size: 0,
            usage: 0,
            item_count: 1,
            mtime: SystemTime::UNIX_EPOCH,
            dev_id: 0,
            inode: 0,
            error_flag: false,
        }
    }

    /// Sets the intrinsic size/usage of this entry (as reported by `lstat`) and mirrors
    /// them into the aggregated fields, which is correct until the first descendant is
    /// attached and [`Tree::aggregate_up`] runs.
    pub fn set_self_stats(&mut self, apparent_size: u64, usage: u64) {
        self.self_apparent_size = apparent_size;
        self.self_usage = usage;
        self.apparent_size = apparent_size;
        self.usage = usage;
    }
}

/// An arena-backed tree of [`EntryData`], addressed by [`NodeId`].
///
/// `base_path` is the absolute path of the scan root; every other node's path is
/// reconstructed by walking ancestors and joining names, per Design Note 9's arena
/// representation.
pub struct Tree {
    arena: Arena<EntryData>,
    root: NodeId,
    base_path: PathBuf,
}

impl Tree {
    /// Creates a new tree whose root is `root_data`, rooted at `base_path`.
    pub fn new(base_path: PathBuf, root_data: EntryData) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(root_data);
        Tree {
            arena,
            root,
            base_path,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    pub fn get(&self, id: NodeId) -> &EntryData {
        self.arena[id].get()
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut EntryData {
        self.arena[id].get_mut()
    }

    pub fn arena(&self) -> &Arena<EntryData> {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena<EntryData> {
        &mut self.arena
    }

    /// Appends a new child under `parent` with `data`, returning the child's id.
    pub fn push_child(&mut self, parent: NodeId, data: EntryData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    /// Ordered children of `node`, following current arena linkage.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena).collect()
    }

    /// Reconstructs the absolute path of `node` by walking ancestors up to the root and
    /// joining names root-to-leaf.
    pub fn path_of(&self, node: NodeId) -> PathBuf {
        let mut names: Vec<&str> = node
            .ancestors(&self.arena)
            .map(|id| self.arena[id].get().name.as_str())
            .collect();
        names.reverse();

        // `names[0]` is the root's own name; the tree's base_path already carries the
        // root's location, so skip it and append the rest.
        let mut path = self.base_path.clone();
        for name in names.into_iter().skip(1) {
            path.push(name);
        }
        path
    }

    /// Recomputes `node`'s own statistics from its *current* children, then repeats for
    /// every ancestor up to the root. Does not touch the children themselves — callers
    /// must ensure children are already correct (e.g. freshly scanned, or already
    /// aggregated) before calling this.
    pub fn aggregate_up(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            self.recompute_own(id);
            current = self.arena[id].parent();
        }
    }

    /// Recomputes every node in `node`'s subtree bottom-up, in a single post-order pass.
    /// Used after a fresh scan attaches a whole subtree at once, where repeatedly calling
    /// [`Tree::aggregate_up`] per leaf would redo ancestor work O(depth) times.
    pub fn recompute_subtree(&mut self, node: NodeId) {
        let children = self.children(node);
        for child in children {
            self.recompute_subtree(child);
        }
        self.recompute_own(node);
    }

    fn recompute_own(&mut self, id: NodeId) {
        if self.arena[id].get().kind != EntryKind::Directory {
            // Leaves have no children to fold in; aggregated fields already mirror the
            // intrinsic stat-derived ones via `set_self_stats`.
            return;
        }

        let children: Vec<NodeId> = id.children(&self.arena).collect();
        let base = self.arena[id].get();
        let mut apparent_size = base.self_apparent_size;
        let mut usage = base.self_usage;
        let mut item_count = 1u64;
        // A directory's own error_flag, once set (e.g. its own readdir failed), must
        // survive recomputation even if every surviving child is clean.
        let mut error_flag = base.error_flag;

        for child in children {
            let c = self.arena[child].get();
            apparent_size += c.apparent_size;
            usage += c.usage;
            item_count += c.item_count;
            error_flag |= c.error_flag;
        }

        let entry = self.arena[id].get_mut();
        entry.apparent_size = apparent_size;
        entry.usage = usage;
        entry.item_count = item_count;
        entry.error_flag = error_flag;
    }

    /// Sorts `node`'s children in place according to `key`, recursing into every
    /// descendant so the whole subtree is ordered consistently.
    pub fn sort_subtree(&mut self, node: NodeId, key: SortKey, reverse: bool) {
        let children = self.children(node);
        for child in &children {
            self.sort_subtree(*child, key, reverse);
        }
        self.sort_children(node, key, reverse);
    }

    fn sort_children(&mut self, node: NodeId, key: SortKey, reverse: bool) {
        let mut children = self.children(node);
        match key {
            SortKey::Usage => {
                children.sort_by_key(|id| Reverse(self.arena[*id].get().usage));
            }
            SortKey::ApparentSize => {
                children.sort_by_key(|id| Reverse(self.arena[*id].get().apparent_size));
            }
            SortKey::ItemCount => {
                children.sort_by_key(|id| Reverse(self.arena[*id].get().item_count));
            }
            SortKey::Name => {
                children.sort_by(|a, b| self.arena[*a].get().name.cmp(&self.arena[*b].get().name));
            }
            SortKey::Mtime => {
                children.sort_by_key(|id| Reverse(self.arena[*id].get().mtime));
            }
        }
        if reverse {
            children.reverse();
        }

        // indextree has no direct "reorder children" primitive, so detach and
        // re-append each child in the desired order.
        for child in &children {
            child.detach(&mut self.arena);
        }
        for child in children {
            node.append(child, &mut self.arena);
        }
    }

    /// Collapses everything beyond `max_depth` levels below `node` into the entries at
    /// `max_depth`, folding descendant statistics upward without changing totals.
    pub fn collapse_to_depth(&mut self, node: NodeId, max_depth: usize) {
        self.collapse_recursive(node, 0, max_depth);
    }

    fn collapse_recursive(&mut self, node: NodeId, current_depth: usize, max_depth: usize) {
        if current_depth >= max_depth {
            // `node`'s aggregated totals already cover all descendants; fold them into
            // its intrinsic fields before detaching children, so a later
            // `aggregate_up` recomputes the same totals from an empty child list.
            let entry = self.arena[node].get_mut();
            entry.self_apparent_size = entry.apparent_size;
            entry.self_usage = entry.usage;

            let children = self.children(node);
            for child in children {
                child.remove_subtree(&mut self.arena);
            }
        } else {
            let children = self.children(node);
            for child in children {
                self.collapse_recursive(child, current_depth + 1, max_depth);
            }
        }
    }
}
