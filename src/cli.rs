//! Command-line interface argument parsing.
//!
//! This module defines the CLI structure using `clap`'s derive macros.
//! The [`CliArgs`] struct automatically generates:
//! - Argument parsing from `std::env::args()`
//! - `--help` and `--version` output
//! - Type validation and error messages
//!
//! # Examples
//!
//! ```
//! use duview::cli::CliArgs;
//! use clap::Parser;
//!
//! let args = CliArgs::parse_from(&["duview", "-H", "/tmp"]);
//! assert!(args.human_readable);
//! assert_eq!(args.paths, vec!["/tmp"]);
//! ```

use clap::Parser;

use crate::entry::SortKey;

/// Command-line arguments for the disk usage analyzer.
#[derive(Parser, Debug)]
#[command(name = "duview", about = "Parallel disk usage analysis engine", version)]
pub struct CliArgs {
    /// Paths to analyze (defaults to current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<String>,

    /// Print sizes in human-readable format (e.g., 1.5K, 2.3M, 4.1G)
    #[arg(short = 'H', long = "human-readable")]
    pub human_readable: bool,

    /// Display only a total for each argument, like `du -s`
    #[arg(short, long)]
    pub summarize: bool,

    /// Max depth of directory traversal shown in output (statistics still cover the
    /// full subtree; deeper entries are folded into the entry at this depth)
    #[arg(short = 'd', long = "max-depth")]
    pub max_depth: Option<usize>,

    /// Show all files, not just directories
    #[arg(short, long)]
    pub all: bool,

    /// Sort order: usage, apparent, name, items, mtime, none
    #[arg(long, default_value = "none")]
    pub sort: String,

    /// Reverse the chosen sort order
    #[arg(long)]
    pub reverse: bool,

    /// Number of worker permits for parallel traversal (defaults to CPU count)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Disable colorized output
    #[arg(long)]
    pub no_color: bool,

    /// Directories to skip entirely during the scan; may be given multiple times
    #[arg(long = "ignore-dirs", value_name = "PATH")]
    pub ignore_dirs: Vec<String>,

    /// Refuse to descend into directories on a different device than the scan root
    #[arg(long = "no-cross")]
    pub no_cross: bool,

    /// Show apparent size (logical byte length) instead of on-disk usage
    #[arg(long = "show-apparent-size")]
    pub show_apparent_size: bool,

    /// List mounted devices and their free/total space instead of scanning a path
    #[arg(long = "show-disks")]
    pub show_disks: bool,

    /// Suppress the periodic progress line written to stderr during a scan
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Reserved for a future interactive front-end; this binary is always non-interactive
    #[arg(long = "non-interactive", hide = true)]
    pub non_interactive: bool,

    /// Write log output to this file instead of discarding it
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    /// Parses the `sort` string into a `SortKey`, plus whether it should be reversed.
    pub fn sort_key(&self) -> Option<SortKey> {
        SortKey::parse(&self.sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["duview"]);
        assert_eq!(args.paths, vec!["."]);
        assert!(!args.human_readable);
        assert!(!args.summarize);
        assert_eq!(args.max_depth, None);
        assert!(!args.all);
        assert_eq!(args.sort, "none");
        assert_eq!(args.threads, None);
        assert!(!args.no_color);
        assert!(args.ignore_dirs.is_empty());
        assert!(!args.no_cross);
        assert!(!args.show_apparent_size);
        assert!(!args.show_disks);
        assert!(!args.no_progress);
        assert_eq!(args.log_file, None);
    }

    #[test]
    fn test_human_readable_flag() {
        let args = CliArgs::parse_from(["duview", "-H"]);
        assert!(args.human_readable);
    }

    #[test]
    fn test_summarize_flag() {
        let args = CliArgs::parse_from(["duview", "-s"]);
        assert!(args.summarize);
    }

    #[test]
    fn test_max_depth() {
        let args = CliArgs::parse_from(["duview", "-d", "3"]);
        assert_eq!(args.max_depth, Some(3));
    }

    #[test]
    fn test_all_flag() {
        let args = CliArgs::parse_from(["duview", "-a"]);
        assert!(args.all);
    }

    #[test]
    fn test_sort_option() {
        let args = CliArgs::parse_from(["duview", "--sort", "usage"]);
        assert_eq!(args.sort, "usage");
        assert_eq!(args.sort_key(), Some(SortKey::Usage));
    }

    #[test]
    fn test_sort_key_none_for_missing_sort() {
        let args = CliArgs::parse_from(["duview", "--sort", "none"]);
        assert_eq!(args.sort_key(), None);
    }

    #[test]
    fn test_threads_option() {
        let args = CliArgs::parse_from(["duview", "-j", "4"]);
        assert_eq!(args.threads, Some(4));
    }

    #[test]
    fn test_no_color_flag() {
        let args = CliArgs::parse_from(["duview", "--no-color"]);
        assert!(args.no_color);
    }

    #[test]
    fn test_multiple_paths() {
        let args = CliArgs::parse_from(["duview", "/tmp", "/var"]);
        assert_eq!(args.paths, vec!["/tmp", "/var"]);
    }

    #[test]
    fn test_ignore_dirs_repeated() {
        let args = CliArgs::parse_from([
            "duview",
            "--ignore-dirs",
            "/proc",
            "--ignore-dirs",
            "/sys",
        ]);
        assert_eq!(args.ignore_dirs, vec!["/proc", "/sys"]);
    }

    #[test]
    fn test_no_cross_flag() {
        let args = CliArgs::parse_from(["duview", "--no-cross"]);
        assert!(args.no_cross);
    }

    #[test]
    fn test_show_disks_flag() {
        let args = CliArgs::parse_from(["duview", "--show-disks"]);
        assert!(args.show_disks);
    }

    #[test]
    fn test_log_file_option() {
        let args = CliArgs::parse_from(["duview", "--log-file", "/tmp/duview.log"]);
        assert_eq!(args.log_file, Some("/tmp/duview.log".to_string()));
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "duview", "-H", "-s", "-a", "-d", "2", "--sort", "name",
        ]);
        assert!(args.human_readable);
        assert!(args.summarize);
        assert!(args.all);
        assert_eq!(args.max_depth, Some(2));
        assert_eq!(args.sort_key(), Some(SortKey::Name));
    }

    #[test]
    fn test_sort_key_invalid_defaults_to_none() {
        let args = CliArgs::parse_from(["duview", "--sort", "bogus"]);
        assert_eq!(args.sort_key(), None);
    }
}
