//! Tree mutation: deletion and rescan, with ancestor statistics repair.
//!
//! Every mutation here follows the same shape: change a subtree, then call
//! [`crate::entry::Tree::aggregate_up`] (or [`crate::entry::Tree::recompute_subtree`] for
//! a freshly-scanned replacement) so the tree's invariants hold again before the function
//! returns. None of these operations touch any node's siblings.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use indextree::NodeId;

use crate::entry::Tree;
use crate::error::ScanError;
use crate::progress::{NullProgress, ProgressSink};
use crate::stat::Stat;
use crate::walker::{WalkOptions, Walker};

/// Deletes the filesystem object at `node` (recursively, if it's a directory) and removes
/// it — and only it — from the tree, repairing every ancestor's statistics.
///
/// Refuses to delete the scan root or any of its ancestors; there are none to protect
/// against here since `node` is always inside `tree`, but a caller handing us the root
/// itself is refused, matching the "can't delete what you're viewing" rule.
pub fn remove(tree: &mut Tree, node: NodeId) -> Result<(), ScanError> {
    if node == tree.root() {
        return Err(ScanError::Refused);
    }

    let path = tree.path_of(node);
    let is_dir = tree.get(node).kind == crate::stat::EntryKind::Directory;

    let result = if is_dir {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };
    result.map_err(|e| ScanError::DeleteFailed(path, e))?;

    let parent = tree.arena()[node].parent();
    node.remove_subtree(tree.arena_mut());

    if let Some(parent) = parent {
        tree.aggregate_up(parent);
    }

    Ok(())
}

/// Detaches a single named child of `parent` from the tree and repairs ancestor
/// statistics. Does **not** touch the filesystem — a linear scan plus detach, used to
/// apply ignore rules or other tree-only filtering post-hoc. If `name` is absent,
/// `parent`'s children are left unchanged and `NotFound` is returned.
pub fn remove_by_name(tree: &mut Tree, parent: NodeId, name: &str) -> Result<(), ScanError> {
    let child = find_by_name(tree, parent, name)
        .ok_or_else(|| ScanError::NotFound(tree.path_of(parent).join(name)))?;
    child.remove_subtree(tree.arena_mut());
    tree.aggregate_up(parent);
    Ok(())
}

/// Finds `parent`'s child named `name`, if any.
pub fn find_by_name(tree: &Tree, parent: NodeId, name: &str) -> Option<NodeId> {
    tree.children(parent)
        .into_iter()
        .find(|id| tree.get(*id).name == name)
}

/// Returns the position of `parent`'s child named `name` among its current siblings
/// (0-based, in arena child order), or `NotFound` if no such child exists.
pub fn index_of(tree: &Tree, parent: NodeId, name: &str) -> Result<usize, ScanError> {
    tree.children(parent)
        .into_iter()
        .position(|id| tree.get(id).name == name)
        .ok_or_else(|| ScanError::NotFound(tree.path_of(parent).join(name)))
}

/// Re-scans the subtree rooted at `node` from the filesystem, replacing its current
/// contents and repairing ancestor statistics. `node` itself is not replaced — its
/// identity (and thus any outstanding references to it) survives the rescan; only its
/// children and aggregated statistics change.
pub fn rescan<S: Stat>(
    tree: &mut Tree,
    node: NodeId,
    walker: &Walker<S>,
    opts: &WalkOptions,
) -> Result<(), ScanError> {
    let path = tree.path_of(node);
    let fresh = walker.analyze(&path, opts, Arc::new(NullProgress) as Arc<dyn ProgressSink>)?;

    // Detach and discard the stale children, then graft the freshly-scanned ones in.
    let stale_children = tree.children(node);
    for child in stale_children {
        child.remove_subtree(tree.arena_mut());
    }

    let fresh_root_data = fresh.get(fresh.root()).clone();
    *tree.get_mut(node) = fresh_root_data;
    graft(tree, node, &fresh, fresh.root());

    tree.recompute_subtree(node);
    if let Some(parent) = tree.arena()[node].parent() {
        tree.aggregate_up(parent);
    }

    Ok(())
}

fn graft(dest: &mut Tree, dest_parent: NodeId, src: &Tree, src_node: NodeId) {
    for src_child in src.children(src_node) {
        let data = src.get(src_child).clone();
        let dest_child = dest.push_child(dest_parent, data);
        graft(dest, dest_child, src, src_child);
    }
}

/// True if `ancestor` is `node` itself or one of its ancestors — used to refuse deleting
/// something that a still-open view depends on.
pub fn is_ancestor_or_self(tree: &Tree, ancestor: NodeId, node: NodeId) -> bool {
    node.ancestors(tree.arena()).any(|id| id == ancestor)
}
