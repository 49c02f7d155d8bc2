//! Terminal output rendering and colorization.
//!
//! This module converts an analyzed [`Tree`] into formatted, optionally colorized
//! terminal output, plus a one-line progress renderer for the non-interactive binary.
//!
//! # Color Scheme
//!
//! ## Size Colors
//!
//! - **Red (bold)**: ≥ 1 GB - Large files, cleanup candidates
//! - **Yellow (bold)**: ≥ 100 MB - Notable size
//! - **Yellow**: ≥ 1 MB - Medium files
//! - **Green**: ≥ 1 KB - Normal files
//! - **Dimmed**: < 1 KB - Small files
//!
//! ## Type Colors
//!
//! - **Blue (bold)**: Directories
//! - **Cyan**: Symlinks
//! - **Default**: Files and other

use colored::Colorize;
use indextree::NodeId;

use crate::entry::Tree;
use crate::formatter::format_size;
use crate::progress::Progress;
use crate::stat::EntryKind;

/// Kilobyte constant for size thresholds.
const KB: u64 = 1024;

/// Megabyte constant for size thresholds.
const MB: u64 = 1024 * KB;

/// Gigabyte constant for size thresholds.
const GB: u64 = 1024 * MB;

/// Applies color to a size string based on magnitude.
fn colorize_size(size_str: &str, bytes: u64) -> String {
    if bytes >= GB {
        size_str.red().bold().to_string()
    } else if bytes >= 100 * MB {
        size_str.yellow().bold().to_string()
    } else if bytes >= MB {
        size_str.yellow().to_string()
    } else if bytes >= KB {
        size_str.green().to_string()
    } else {
        size_str.dimmed().to_string()
    }
}

/// Applies color to a path string based on entry kind, following `ls --color` conventions.
fn colorize_path(path_str: &str, kind: EntryKind) -> String {
    match kind {
        EntryKind::Directory => path_str.blue().bold().to_string(),
        EntryKind::Symlink => path_str.cyan().to_string(),
        EntryKind::File | EntryKind::Other => path_str.to_string(),
    }
}

/// Renders a single tree node as a formatted line: `<size>\t<path>`.
///
/// `use_apparent_size` selects between on-disk usage (the default, matching `du`) and
/// logical apparent size (`--show-apparent-size`). An entry with its error flag set gets
/// a trailing `!` marker, regardless of color mode.
pub fn render_entry(
    tree: &Tree,
    node: NodeId,
    human_readable: bool,
    use_color: bool,
    use_apparent_size: bool,
) -> String {
    let entry = tree.get(node);
    let size = if use_apparent_size {
        entry.apparent_size
    } else {
        entry.usage
    };
    let size_str = format_size(size, human_readable);
    let mut path_str = tree.path_of(node).display().to_string();
    if entry.error_flag {
        path_str.push('!');
    }

    if use_color {
        let colored_size = colorize_size(&size_str, size);
        let colored_path = colorize_path(&path_str, entry.kind);
        format!("{colored_size}\t{colored_path}")
    } else {
        format!("{size_str}\t{path_str}")
    }
}

/// Renders a tree as multi-line output, `du`-style: children before parents.
///
/// In summarize mode, only the root's line is produced. Otherwise, directories are
/// always shown; files are shown only when `show_all` is set.
pub fn render_tree(
    tree: &Tree,
    human_readable: bool,
    show_all: bool,
    summarize: bool,
    use_color: bool,
    use_apparent_size: bool,
) -> String {
    let mut lines = Vec::new();

    if summarize {
        lines.push(render_entry(
            tree,
            tree.root(),
            human_readable,
            use_color,
            use_apparent_size,
        ));
    } else {
        collect_lines(
            tree,
            tree.root(),
            human_readable,
            show_all,
            use_color,
            use_apparent_size,
            &mut lines,
        );
    }

    lines.join("\n")
}

fn collect_lines(
    tree: &Tree,
    node: NodeId,
    human_readable: bool,
    show_all: bool,
    use_color: bool,
    use_apparent_size: bool,
    lines: &mut Vec<String>,
) {
    let kind = tree.get(node).kind;
    let should_show = match kind {
        EntryKind::Directory => true,
        _ => show_all,
    };

    for child in tree.children(node) {
        collect_lines(
            tree,
            child,
            human_readable,
            show_all,
            use_color,
            use_apparent_size,
            lines,
        );
    }

    if should_show {
        lines.push(render_entry(
            tree,
            node,
            human_readable,
            use_color,
            use_apparent_size,
        ));
    }
}

/// Renders a single progress line for the non-interactive binary:
/// `"<items-counted> items, current: <path>"`, written to stderr by the caller.
pub fn render_progress_line(progress: &Progress) -> String {
    match &progress.current_item_name {
        Some(path) => format!(
            "{} items, current: {}",
            progress.items_counted,
            path.display()
        ),
        None => format!("{} items", progress.items_counted),
    }
}

/// Renders a device listing for `--show-disks`.
pub fn render_devices(devices: &[crate::device::DeviceInfo], human_readable: bool) -> String {
    devices
        .iter()
        .map(|d| {
            let used = d.total_bytes.saturating_sub(d.free_bytes);
            format!(
                "{}\t{}\t{} used / {} free\t{}",
                d.mount_point,
                d.fs_type,
                format_size(used, human_readable),
                format_size(d.free_bytes, human_readable),
                format_size(d.total_bytes, human_readable),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
