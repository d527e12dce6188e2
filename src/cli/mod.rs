//! Command-line interface for codepractice.
//!
//! Provides commands for diffing revisions, parsing statements, browsing the
//! catalog and driving a workspace.

mod commands;

pub use commands::{parse_cli, render_diff_rows, run, run_with_cli, Cli};
