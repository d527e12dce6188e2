//! codepractice: core of a coding-practice workspace client.
//!
//! This library provides the line diff used to compare attempts, the parser
//! that structures raw problem statements, and the workspace state machine
//! that drives run, submit and analyze against a practice backend.

// Core modules
pub mod api;
pub mod cli;
pub mod config;
pub mod description;
pub mod diff;
pub mod error;
pub mod workspace;

// Re-export commonly used types
pub use api::{HttpPracticeApi, PracticeApi};
pub use config::{ClientConfig, ConfigError};
pub use description::{parse_problem_description, ParsedProblemDescription};
pub use diff::{compute_diff, diff_text, DiffKind, LineDiffRow};
pub use error::{ApiError, WorkspaceError};
pub use workspace::{WorkspaceController, WorkspaceStage, WorkspaceState};
