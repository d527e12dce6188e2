//! Effect runner for the workspace state machine.

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

use super::event::{
    AnalysisSource, LoadedProblem, SessionRequest, WorkspaceEffect, WorkspaceEvent,
};
use super::reducer::reduce;
use super::state::WorkspaceState;
use crate::api::PracticeApi;
use crate::config::ClientConfig;
use crate::error::WorkspaceError;

const SYNC_ACTION: &str = "syncing your session";

/// Drives a [`WorkspaceState`] against a backend.
///
/// All requests run cooperatively on the caller's task. Completions are
/// applied in the order they finish, and the reducer discards any that
/// belong to a problem or lineage the user has since left.
pub struct WorkspaceController {
    api: Arc<dyn PracticeApi>,
    state: WorkspaceState,
    in_flight: FuturesUnordered<BoxFuture<'static, WorkspaceEvent>>,
}

impl WorkspaceController {
    pub fn new(api: Arc<dyn PracticeApi>, config: &ClientConfig) -> Self {
        let mut state = WorkspaceState::new(config.default_language_id);
        state.auth_token = config.auth_token.clone();
        Self {
            api,
            state,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Number of requests issued but not yet applied.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Applies an event and starts whatever requests it produces.
    pub fn dispatch(&mut self, event: WorkspaceEvent) {
        for effect in reduce(&mut self.state, event) {
            debug!(request = effect.label(), "Starting request");
            self.in_flight.push(perform(Arc::clone(&self.api), effect));
        }
    }

    /// Waits for the next request to finish and applies it.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        match self.in_flight.next().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Applies completions until no request remains in flight.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Opens a problem, optionally adopting a deep-linked session.
    pub async fn load_problem(
        &mut self,
        slug: &str,
        requested_session: Option<SessionRequest>,
    ) -> Result<(), WorkspaceError> {
        self.dispatch(WorkspaceEvent::LoadProblem {
            slug: slug.to_string(),
            requested_session,
        });
        self.settle().await;
        self.state.load_error.clone().map_or(Ok(()), Err)
    }

    /// Hands the workspace a session id after the problem is open.
    pub async fn request_session(
        &mut self,
        request: SessionRequest,
    ) -> Result<(), WorkspaceError> {
        self.dispatch(WorkspaceEvent::RequestSession(request));
        self.settle().await;
        self.state.analysis_error.clone().map_or(Ok(()), Err)
    }

    pub async fn run(&mut self) -> Result<(), WorkspaceError> {
        self.dispatch(WorkspaceEvent::Run);
        self.settle().await;
        self.state.run_error.clone().map_or(Ok(()), Err)
    }

    pub async fn submit(&mut self) -> Result<(), WorkspaceError> {
        self.dispatch(WorkspaceEvent::Submit);
        self.settle().await;
        self.state.submit_error.clone().map_or(Ok(()), Err)
    }

    pub async fn analyze(&mut self) -> Result<(), WorkspaceError> {
        self.dispatch(WorkspaceEvent::Analyze);
        self.settle().await;
        self.state.analysis_error.clone().map_or(Ok(()), Err)
    }

    pub fn change_language(&mut self, language_id: u32) {
        self.dispatch(WorkspaceEvent::ChangeLanguage(language_id));
    }

    pub fn reset_starter(&mut self) {
        self.dispatch(WorkspaceEvent::ResetStarter);
    }

    pub fn edit_code(&mut self, code: impl Into<String>) {
        self.dispatch(WorkspaceEvent::EditCode(code.into()));
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.dispatch(WorkspaceEvent::SetAuthToken(token));
    }

    pub fn select_left_attempt(&mut self, attempt_id: i64) -> Result<(), WorkspaceError> {
        self.ensure_attempt(attempt_id)?;
        self.dispatch(WorkspaceEvent::SelectLeftAttempt(attempt_id));
        Ok(())
    }

    pub fn select_right_attempt(&mut self, attempt_id: i64) -> Result<(), WorkspaceError> {
        self.ensure_attempt(attempt_id)?;
        self.dispatch(WorkspaceEvent::SelectRightAttempt(attempt_id));
        Ok(())
    }

    fn ensure_attempt(&self, attempt_id: i64) -> Result<(), WorkspaceError> {
        match self.state.session.attempt(attempt_id) {
            Some(_) => Ok(()),
            None => Err(WorkspaceError::UnknownAttempt(attempt_id)),
        }
    }

    /// Registers the current token with the backend's session store.
    pub async fn sync_auth_session(&self) -> Result<bool, WorkspaceError> {
        let token = self
            .state
            .auth_token
            .as_deref()
            .ok_or(WorkspaceError::AuthRequired {
                action: SYNC_ACTION,
            })?;
        let response = self.api.sync_auth_session(token).await?;
        Ok(response.ok)
    }
}

/// Performs one effect, resolving to the event that reports its outcome.
fn perform(
    api: Arc<dyn PracticeApi>,
    effect: WorkspaceEffect,
) -> BoxFuture<'static, WorkspaceEvent> {
    async move {
        match effect {
            WorkspaceEffect::FetchProblem { generation, slug } => {
                let (problem, languages) =
                    tokio::join!(api.get_problem(&slug), api.list_languages());
                let languages = languages.unwrap_or_else(|error| {
                    warn!(error = %error, "Failed to list languages, using built-in list");
                    Vec::new()
                });
                WorkspaceEvent::ProblemLoaded {
                    generation,
                    slug,
                    result: problem.map(|problem| LoadedProblem { problem, languages }),
                }
            }
            WorkspaceEffect::RunVisibleTests {
                lineage,
                slug,
                request,
            } => WorkspaceEvent::RunFinished {
                lineage,
                result: api.run_visible_tests(&slug, &request).await,
            },
            WorkspaceEffect::SubmitSolution {
                lineage,
                slug,
                request,
                token,
            } => WorkspaceEvent::SubmitFinished {
                lineage,
                result: api.submit(&slug, &request, &token).await,
            },
            WorkspaceEffect::GenerateAnalysis {
                lineage,
                session_id,
                token,
            } => {
                let result = api.generate_analysis(&session_id, &token).await;
                WorkspaceEvent::AnalysisFinished {
                    lineage,
                    session_id,
                    source: AnalysisSource::Generated,
                    result,
                }
            }
            WorkspaceEffect::FetchSavedAnalysis {
                lineage,
                session_id,
                token,
            } => {
                let result = api.fetch_analysis(&session_id, &token).await;
                WorkspaceEvent::AnalysisFinished {
                    lineage,
                    session_id,
                    source: AnalysisSource::Saved,
                    result,
                }
            }
        }
    }
    .boxed()
}
