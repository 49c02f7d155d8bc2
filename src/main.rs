//! Binary entry point for the disk usage analyzer CLI.
//!
//! This is the main executable that provides the command-line interface.
//! It handles:
//! - Parsing command-line arguments using `clap`
//! - Initializing logging when `--log-file` is given
//! - Calling the library's `run()` function
//! - Error handling and exit code management
//!
//! # Architecture
//!
//! The binary is kept minimal - all business logic lives in the library (`lib.rs`).
//! This separation enables:
//! - Testing without spawning processes
//! - Reusing the library in other Rust projects
//! - Clear separation between CLI and core logic
//!
//! # Example Usage
//!
//! ```bash
//! # Analyze current directory
//! duview
//!
//! # Analyze with human-readable sizes
//! duview -H /path/to/dir
//!
//! # Show summary only, sorted by usage
//! duview -s --sort usage /tmp
//! ```

use std::fs::OpenOptions;
use std::process;

use clap::Parser;

use duview::cli::CliArgs;
use duview::run;

/// Sets up `env_logger` writing to the given file path, if one was requested. Log level is
/// still controlled by `RUST_LOG`; `--log-file` only redirects the destination.
fn init_logging(log_file: Option<&str>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("duview: could not open log file {path}: {e}");
            }
        }
    }
    builder.init();
}

/// Main entry point for the disk usage analyzer.
///
/// This function orchestrates the CLI workflow:
/// 1. Parse command-line arguments using `CliArgs::parse()`
/// 2. Initialize logging
/// 3. Delegate to `duview::run()` for execution
/// 4. Handle errors by printing to stderr and setting exit code
///
/// # Exit Codes
///
/// - `0`: Success
/// - `1`: Error (printed to stderr)
fn main() {
    let args = CliArgs::parse();
    init_logging(args.log_file.as_deref());

    if let Err(err) = run(&args) {
        eprintln!("duview: {err}");
        process::exit(1);
    }
}
