//! Pure transition function for the workspace.
//!
//! [`reduce`] applies one [`WorkspaceEvent`] to a [`WorkspaceState`] and
//! returns the network work the event calls for. It never performs I/O.
//!
//! Two counters keep late completions from touching unrelated state:
//! `generation` tags problem loads, `lineage` tags run/submit/analysis
//! requests. Both are compared when the completion is applied, and a
//! mismatch drops the completion.

use tracing::{debug, info, warn};

use super::event::{
    AnalysisSource, LoadedProblem, SessionRequest, WorkspaceEffect, WorkspaceEvent,
};
use super::selection::reconcile_selection;
use super::starter::{build_starter_code, fallback_languages, pick_language};
use super::state::{Session, WorkspaceState};
use super::terminal;
use crate::api::{AnalyzeResponse, RunRequest, SubmitRequest};
use crate::description::ParsedProblemDescription;
use crate::error::{ApiError, WorkspaceError};

const SUBMIT_ACTION: &str = "submitting";
const ANALYZE_ACTION: &str = "analyzing";

/// Applies `event` to `state`, returning the effects to perform.
pub fn reduce(state: &mut WorkspaceState, event: WorkspaceEvent) -> Vec<WorkspaceEffect> {
    match event {
        WorkspaceEvent::LoadProblem {
            slug,
            requested_session,
        } => load_problem(state, slug, requested_session),
        WorkspaceEvent::RequestSession(request) => {
            state.requested_session = Some(request);
            try_hydrate(state)
        }
        WorkspaceEvent::ChangeLanguage(language_id) => {
            change_language(state, language_id);
            Vec::new()
        }
        WorkspaceEvent::ResetStarter => {
            reset_starter(state);
            Vec::new()
        }
        WorkspaceEvent::EditCode(code) => {
            state.code = code;
            Vec::new()
        }
        WorkspaceEvent::SetAuthToken(token) => {
            state.auth_token = token.filter(|token| !token.trim().is_empty());
            Vec::new()
        }
        WorkspaceEvent::Run => run(state),
        WorkspaceEvent::Submit => submit(state),
        WorkspaceEvent::Analyze => analyze(state),
        WorkspaceEvent::SelectLeftAttempt(id) => {
            if state.session.attempt(id).is_some() {
                state.session.selected_left_attempt_id = Some(id);
            }
            Vec::new()
        }
        WorkspaceEvent::SelectRightAttempt(id) => {
            if state.session.attempt(id).is_some() {
                state.session.selected_right_attempt_id = Some(id);
            }
            Vec::new()
        }
        WorkspaceEvent::ProblemLoaded {
            generation,
            slug,
            result,
        } => problem_loaded(state, generation, slug, result),
        WorkspaceEvent::RunFinished { lineage, result } => {
            if is_stale_lineage(state, lineage, "run") {
                return Vec::new();
            }
            state.running = false;
            let command = terminal::run_command(state.selected_language_name());
            match result {
                Ok(response) => {
                    state.terminal_lines = terminal::execution_lines(
                        command,
                        response.overall_status,
                        response.passed_count,
                        response.total_count,
                        &response.tests,
                    );
                    state.session.run_result = Some(response);
                }
                Err(error) => {
                    let error = WorkspaceError::from(error);
                    state.terminal_lines = terminal::error_lines(command, &error);
                    state.run_error = Some(error);
                }
            }
            Vec::new()
        }
        WorkspaceEvent::SubmitFinished { lineage, result } => {
            if is_stale_lineage(state, lineage, "submit") {
                return Vec::new();
            }
            state.submitting = false;
            let command = terminal::submit_command(state.selected_language_name());
            match result {
                Ok(response) => {
                    info!(
                        session_id = %response.session_id,
                        status = %response.overall_status,
                        "Submission evaluated"
                    );
                    state.terminal_lines = terminal::execution_lines(
                        command,
                        response.overall_status,
                        response.passed_count,
                        response.total_count,
                        &response.tests,
                    );
                    state.session.session_id = Some(response.session_id.clone());
                    state.session.submit_result = Some(response);
                }
                Err(error) => {
                    let error = WorkspaceError::from(error);
                    state.terminal_lines = terminal::error_lines(command, &error);
                    state.submit_error = Some(error);
                }
            }
            Vec::new()
        }
        WorkspaceEvent::AnalysisFinished {
            lineage,
            session_id,
            source,
            result,
        } => analysis_finished(state, lineage, session_id, source, result),
    }
}

fn load_problem(
    state: &mut WorkspaceState,
    slug: String,
    requested_session: Option<SessionRequest>,
) -> Vec<WorkspaceEffect> {
    state.generation += 1;
    state.lineage += 1;
    state.problem = None;
    state.description = ParsedProblemDescription::default();
    state.code.clear();
    state.requested_session = requested_session;
    state.session = Session::default();
    state.running = false;
    state.submitting = false;
    state.analyzing = false;
    state.load_error = None;
    state.run_error = None;
    state.submit_error = None;
    state.analysis_error = None;
    state.terminal_lines = vec![terminal::TERMINAL_READY.to_string()];

    let slug = slug.trim().to_string();
    if slug.is_empty() {
        state.slug = None;
        state.loading = false;
        state.load_error = Some(WorkspaceError::MissingSlug);
        return Vec::new();
    }

    debug!(slug = %slug, generation = state.generation, "Loading problem");
    state.slug = Some(slug.clone());
    state.loading = true;
    vec![WorkspaceEffect::FetchProblem {
        generation: state.generation,
        slug,
    }]
}

fn problem_loaded(
    state: &mut WorkspaceState,
    generation: u64,
    slug: String,
    result: Result<LoadedProblem, ApiError>,
) -> Vec<WorkspaceEffect> {
    if generation != state.generation || state.slug.as_deref() != Some(slug.as_str()) {
        debug!(
            slug = %slug,
            stale_generation = generation,
            current_generation = state.generation,
            "Discarding stale problem load"
        );
        return Vec::new();
    }

    state.loading = false;

    let loaded = match result {
        Ok(loaded) => loaded,
        Err(error) => {
            warn!(slug = %slug, error = %error, "Failed to load problem");
            state.load_error = Some(error.into());
            return Vec::new();
        }
    };

    let languages = if loaded.languages.is_empty() {
        fallback_languages()
    } else {
        loaded.languages
    };
    let Some(language_id) = pick_language(&languages, state.language_id).map(|l| l.id) else {
        state.load_error = Some(WorkspaceError::NoLanguageAvailable);
        return Vec::new();
    };

    info!(slug = %slug, language_id, "Problem loaded");
    state.languages = languages;
    state.language_id = language_id;
    state.code = build_starter_code(&loaded.problem, language_id);
    state.description = loaded.problem.parsed_description();
    state.problem = Some(loaded.problem);

    try_hydrate(state)
}

/// Drops the current attempt lineage, cancelling any in-flight action results.
fn discard_lineage(state: &mut WorkspaceState) {
    state.lineage += 1;
    state.session.clear_attempt_lineage();
    state.running = false;
    state.submitting = false;
    state.analyzing = false;
    state.run_error = None;
    state.submit_error = None;
    state.analysis_error = None;
}

fn change_language(state: &mut WorkspaceState, language_id: u32) {
    state.language_id = language_id;

    let Some(problem) = state.problem.as_ref() else {
        return;
    };
    state.code = build_starter_code(problem, language_id);
    discard_lineage(state);

    let name = state
        .languages
        .iter()
        .find(|language| language.id == language_id)
        .map_or_else(|| language_id.to_string(), |language| language.name.clone());
    debug!(language_id, "Language switched");
    state.terminal_lines = vec![terminal::language_switched_line(&name)];
}

fn reset_starter(state: &mut WorkspaceState) {
    let Some(problem) = state.problem.as_ref() else {
        return;
    };
    state.code = build_starter_code(problem, state.language_id);
    discard_lineage(state);
    state.terminal_lines = vec![terminal::STARTER_RESTORED.to_string()];
}

fn run(state: &mut WorkspaceState) -> Vec<WorkspaceEffect> {
    let Some(problem) = state.problem.as_ref() else {
        return Vec::new();
    };
    if state.running {
        debug!("Run already in progress");
        return Vec::new();
    }

    let slug = problem.slug.clone();
    state.running = true;
    state.run_error = None;
    vec![WorkspaceEffect::RunVisibleTests {
        lineage: state.lineage,
        slug,
        request: RunRequest {
            code: state.code.clone(),
            language_id: state.language_id,
        },
    }]
}

fn submit(state: &mut WorkspaceState) -> Vec<WorkspaceEffect> {
    let Some(problem) = state.problem.as_ref() else {
        return Vec::new();
    };
    if state.submitting {
        debug!("Submit already in progress");
        return Vec::new();
    }
    let slug = problem.slug.clone();

    state.submit_error = None;
    state.analysis_error = None;

    let Some(token) = state.auth_token.clone() else {
        let error = WorkspaceError::AuthRequired {
            action: SUBMIT_ACTION,
        };
        state.terminal_lines = terminal::error_lines(
            terminal::submit_command(state.selected_language_name()),
            &error,
        );
        state.submit_error = Some(error);
        return Vec::new();
    };

    state.submitting = true;
    vec![WorkspaceEffect::SubmitSolution {
        lineage: state.lineage,
        slug,
        request: SubmitRequest {
            code: state.code.clone(),
            language_id: state.language_id,
            session_id: state.session.session_id.clone(),
        },
        token,
    }]
}

fn analyze(state: &mut WorkspaceState) -> Vec<WorkspaceEffect> {
    let Some(session_id) = state.session.session_id.clone() else {
        state.analysis_error = Some(WorkspaceError::MissingSession);
        return Vec::new();
    };
    if state.analyzing {
        debug!("Analysis already in progress");
        return Vec::new();
    }

    state.analysis_error = None;
    match state.auth_token.clone() {
        Some(token) => {
            state.analyzing = true;
            vec![WorkspaceEffect::GenerateAnalysis {
                lineage: state.lineage,
                session_id,
                token,
            }]
        }
        None => {
            analysis_failed(
                state,
                &session_id,
                WorkspaceError::AuthRequired {
                    action: ANALYZE_ACTION,
                },
            );
            Vec::new()
        }
    }
}

/// Adopts the requested session once per problem view.
fn try_hydrate(state: &mut WorkspaceState) -> Vec<WorkspaceEffect> {
    if state.problem.is_none() || state.loading || state.load_error.is_some() {
        return Vec::new();
    }
    let Some(request) = state.requested_session.clone() else {
        return Vec::new();
    };
    if state.session.hydrated_for.as_deref() == Some(request.session_id.as_str()) {
        return Vec::new();
    }

    info!(
        session_id = %request.session_id,
        auto_analyze = request.auto_analyze,
        "Hydrating requested session"
    );
    state.session.hydrated_for = Some(request.session_id.clone());
    state.session.session_id = Some(request.session_id.clone());
    state.analysis_error = None;

    if !request.auto_analyze {
        state.terminal_lines = terminal::session_restored_lines(&request.session_id);
        return Vec::new();
    }
    if state.analyzing {
        debug!(session_id = %request.session_id, "Analysis already in progress; skipping auto-analyze");
        return Vec::new();
    }

    match state.auth_token.clone() {
        Some(token) => {
            state.analyzing = true;
            vec![WorkspaceEffect::FetchSavedAnalysis {
                lineage: state.lineage,
                session_id: request.session_id,
                token,
            }]
        }
        None => {
            analysis_failed(
                state,
                &request.session_id,
                WorkspaceError::AuthRequired {
                    action: ANALYZE_ACTION,
                },
            );
            Vec::new()
        }
    }
}

fn analysis_finished(
    state: &mut WorkspaceState,
    lineage: u64,
    session_id: String,
    source: AnalysisSource,
    result: Result<AnalyzeResponse, ApiError>,
) -> Vec<WorkspaceEffect> {
    if is_stale_lineage(state, lineage, "analysis") {
        return Vec::new();
    }

    let response = match result {
        Ok(response) => response,
        Err(ApiError::AnalysisNotGenerated(message)) if source == AnalysisSource::Saved => {
            debug!(session_id = %session_id, message = %message, "No saved analysis; generating");
            let Some(token) = state.auth_token.clone() else {
                analysis_failed(
                    state,
                    &session_id,
                    WorkspaceError::AuthRequired {
                        action: ANALYZE_ACTION,
                    },
                );
                return Vec::new();
            };
            return vec![WorkspaceEffect::GenerateAnalysis {
                lineage,
                session_id,
                token,
            }];
        }
        Err(error) => {
            analysis_failed(state, &session_id, error.into());
            return Vec::new();
        }
    };

    state.analyzing = false;
    let command = terminal::analyze_command(&session_id, source == AnalysisSource::Saved);
    state.terminal_lines = terminal::analysis_lines(command, &response.analysis);

    let session = &mut state.session;
    session.session_id = Some(session_id);
    session.analysis_result = Some(response.analysis);
    session.attempt_snapshots = response.attempts;
    let (left, right) = reconcile_selection(
        &session.attempt_snapshots,
        session.selected_left_attempt_id,
        session.selected_right_attempt_id,
    );
    session.selected_left_attempt_id = left;
    session.selected_right_attempt_id = right;

    Vec::new()
}

fn analysis_failed(state: &mut WorkspaceState, session_id: &str, error: WorkspaceError) {
    warn!(session_id = %session_id, error = %error, "Analysis failed");
    state.analyzing = false;
    state.terminal_lines =
        terminal::error_lines(terminal::analyze_command(session_id, false), &error);
    state.analysis_error = Some(error);
}

fn is_stale_lineage(state: &WorkspaceState, lineage: u64, action: &str) -> bool {
    if lineage == state.lineage {
        return false;
    }
    debug!(
        action,
        stale_lineage = lineage,
        current_lineage = state.lineage,
        "Discarding stale result"
    );
    true
}
