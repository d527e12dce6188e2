//! Problem workspace: run, submit and analyze against one problem.
//!
//! The workspace is an explicit state machine. [`WorkspaceState`] holds
//! everything for one visit, [`reduce`] applies [`WorkspaceEvent`]s to it and
//! returns [`WorkspaceEffect`]s, and [`WorkspaceController`] performs those
//! effects against a [`PracticeApi`](crate::api::PracticeApi), feeding each
//! completion back in as another event.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use codepractice::api::HttpPracticeApi;
//! use codepractice::config::ClientConfig;
//! use codepractice::workspace::WorkspaceController;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let api = Arc::new(HttpPracticeApi::new(&config)?);
//! let mut workspace = WorkspaceController::new(api, &config);
//!
//! workspace.load_problem("two-sum", None).await?;
//! workspace.run().await?;
//! for line in &workspace.state().terminal_lines {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

mod controller;
mod event;
mod reducer;
mod selection;
mod starter;
mod state;
pub mod terminal;

pub use controller::WorkspaceController;
pub use event::{
    AnalysisSource, LoadedProblem, SessionRequest, WorkspaceEffect, WorkspaceEvent,
};
pub use reducer::reduce;
pub use selection::reconcile_selection;
pub use starter::{build_starter_code, fallback_languages, pick_language, DEFAULT_LANGUAGE_ID};
pub use state::{FlowStep, Session, WorkspaceStage, WorkspaceState};
