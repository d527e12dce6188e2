//! Workspace state and the views derived from it.

use serde::Serialize;

use super::event::SessionRequest;
use super::starter::fallback_languages;
use super::terminal::TERMINAL_READY;
use crate::api::{
    AttemptSnapshot, Language, ProblemDetail, RunResponse, SessionAnalysis, SubmitResponse,
};
use crate::description::ParsedProblemDescription;
use crate::diff::{diff_text, LineDiffRow};
use crate::error::WorkspaceError;

/// Coarse stage shown to the user, derived from the busy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceStage {
    Loading,
    Ready,
    Running,
    Submitting,
    Analyzing,
}

impl WorkspaceStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceStage::Loading => "loading",
            WorkspaceStage::Ready => "ready",
            WorkspaceStage::Running => "running",
            WorkspaceStage::Submitting => "submitting",
            WorkspaceStage::Analyzing => "analyzing",
        }
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self, WorkspaceStage::Ready)
    }
}

impl std::fmt::Display for WorkspaceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attempt lineage for one problem and language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Assigned by the first successful submit or by hydration.
    pub session_id: Option<String>,
    pub run_result: Option<RunResponse>,
    pub submit_result: Option<SubmitResponse>,
    pub analysis_result: Option<SessionAnalysis>,
    pub attempt_snapshots: Vec<AttemptSnapshot>,
    pub selected_left_attempt_id: Option<i64>,
    pub selected_right_attempt_id: Option<i64>,
    /// Requested session id already adopted for this problem view.
    pub hydrated_for: Option<String>,
}

impl Session {
    /// Drops everything tied to the current attempt lineage.
    ///
    /// `hydrated_for` survives: a deep-linked session is adopted once per
    /// problem view even if the lineage is later abandoned.
    pub fn clear_attempt_lineage(&mut self) {
        *self = Session {
            hydrated_for: self.hydrated_for.take(),
            ..Session::default()
        };
    }

    pub fn attempt(&self, id: i64) -> Option<&AttemptSnapshot> {
        self.attempt_snapshots.iter().find(|attempt| attempt.id == id)
    }
}

/// One entry of the Understand/Code/Run/Submit/Analyze progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowStep {
    pub title: &'static str,
    pub done: bool,
}

/// Everything the workspace knows during one visit.
///
/// Mutated only by [`reduce`](super::reduce).
#[derive(Debug, Clone)]
pub struct WorkspaceState {
    /// Bumped by every problem load; load completions carry the value they were issued under.
    pub(crate) generation: u64,
    /// Bumped whenever the attempt lineage is discarded (load, language switch, reset).
    pub(crate) lineage: u64,

    pub slug: Option<String>,
    pub problem: Option<ProblemDetail>,
    pub description: ParsedProblemDescription,
    pub languages: Vec<Language>,
    pub language_id: u32,
    pub code: String,
    pub auth_token: Option<String>,
    pub requested_session: Option<SessionRequest>,
    pub session: Session,

    pub loading: bool,
    pub running: bool,
    pub submitting: bool,
    pub analyzing: bool,

    pub load_error: Option<WorkspaceError>,
    pub run_error: Option<WorkspaceError>,
    pub submit_error: Option<WorkspaceError>,
    pub analysis_error: Option<WorkspaceError>,

    pub terminal_lines: Vec<String>,
}

impl WorkspaceState {
    pub fn new(default_language_id: u32) -> Self {
        Self {
            generation: 0,
            lineage: 0,
            slug: None,
            problem: None,
            description: ParsedProblemDescription::default(),
            languages: fallback_languages(),
            language_id: default_language_id,
            code: String::new(),
            auth_token: None,
            requested_session: None,
            session: Session::default(),
            loading: false,
            running: false,
            submitting: false,
            analyzing: false,
            load_error: None,
            run_error: None,
            submit_error: None,
            analysis_error: None,
            terminal_lines: vec![TERMINAL_READY.to_string()],
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn lineage(&self) -> u64 {
        self.lineage
    }

    pub fn stage(&self) -> WorkspaceStage {
        if self.loading {
            WorkspaceStage::Loading
        } else if self.analyzing {
            WorkspaceStage::Analyzing
        } else if self.submitting {
            WorkspaceStage::Submitting
        } else if self.running {
            WorkspaceStage::Running
        } else {
            WorkspaceStage::Ready
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.session_id.as_deref()
    }

    /// The selected language, or the first offered one.
    pub fn selected_language(&self) -> Option<&Language> {
        self.languages
            .iter()
            .find(|language| language.id == self.language_id)
            .or_else(|| self.languages.first())
    }

    pub fn selected_language_name(&self) -> &str {
        self.selected_language()
            .map_or("Unknown", |language| language.name.as_str())
    }

    pub fn flow_steps(&self) -> [FlowStep; 5] {
        [
            FlowStep {
                title: "Understand",
                done: true,
            },
            FlowStep {
                title: "Code",
                done: !self.code.trim().is_empty(),
            },
            FlowStep {
                title: "Run Visible Tests",
                done: self.session.run_result.is_some(),
            },
            FlowStep {
                title: "Submit",
                done: self.session.submit_result.is_some(),
            },
            FlowStep {
                title: "Analyze",
                done: self.session.analysis_result.is_some(),
            },
        ]
    }

    pub fn selected_left_attempt(&self) -> Option<&AttemptSnapshot> {
        self.session
            .selected_left_attempt_id
            .and_then(|id| self.session.attempt(id))
    }

    pub fn selected_right_attempt(&self) -> Option<&AttemptSnapshot> {
        self.session
            .selected_right_attempt_id
            .and_then(|id| self.session.attempt(id))
    }

    /// Line diff between the selected attempts; empty until both sides are selected.
    pub fn attempt_diff(&self) -> Vec<LineDiffRow> {
        match (self.selected_left_attempt(), self.selected_right_attempt()) {
            (Some(left), Some(right)) => diff_text(&left.code, &right.code),
            _ => Vec::new(),
        }
    }

    pub fn can_run(&self) -> bool {
        self.problem.is_some() && !self.loading && !self.running && !self.code.trim().is_empty()
    }

    pub fn can_submit(&self) -> bool {
        self.problem.is_some()
            && !self.loading
            && !self.submitting
            && !self.code.trim().is_empty()
    }

    pub fn can_analyze(&self) -> bool {
        !self.analyzing && self.session.session_id.is_some()
    }
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self::new(super::starter::DEFAULT_LANGUAGE_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AttemptStatus;
    use crate::diff::DiffKind;
    use chrono::Utc;

    fn snapshot(id: i64, code: &str) -> AttemptSnapshot {
        AttemptSnapshot {
            id,
            code: code.to_string(),
            status: AttemptStatus::WrongAnswer,
            error_type: None,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_state_is_ready_with_fallback_languages() {
        let state = WorkspaceState::new(71);
        assert_eq!(state.stage(), WorkspaceStage::Ready);
        assert_eq!(state.selected_language_name(), "Python (3.x)");
        assert_eq!(state.terminal_lines, vec![TERMINAL_READY]);
        assert!(!state.can_run());
        assert!(!state.can_analyze());
    }

    #[test]
    fn test_stage_priority() {
        let mut state = WorkspaceState::default();
        state.running = true;
        state.submitting = true;
        assert_eq!(state.stage(), WorkspaceStage::Submitting);
        state.analyzing = true;
        assert_eq!(state.stage(), WorkspaceStage::Analyzing);
        state.loading = true;
        assert_eq!(state.stage(), WorkspaceStage::Loading);
        assert!(state.stage().is_busy());
    }

    #[test]
    fn test_unknown_language_falls_back_to_first() {
        let mut state = WorkspaceState::default();
        state.language_id = 4242;
        assert_eq!(state.selected_language_name(), "Python (3.x)");

        state.languages.clear();
        assert_eq!(state.selected_language_name(), "Unknown");
    }

    #[test]
    fn test_flow_steps_follow_state() {
        let mut state = WorkspaceState::default();
        let done: Vec<bool> = state.flow_steps().iter().map(|step| step.done).collect();
        assert_eq!(done, vec![true, false, false, false, false]);

        state.code = "print(1)".to_string();
        assert!(state.flow_steps()[1].done);
        assert_eq!(state.flow_steps()[2].title, "Run Visible Tests");
    }

    #[test]
    fn test_clear_attempt_lineage_keeps_hydration_marker() {
        let mut session = Session {
            session_id: Some("s1".to_string()),
            attempt_snapshots: vec![snapshot(1, "a")],
            selected_left_attempt_id: Some(1),
            selected_right_attempt_id: Some(1),
            hydrated_for: Some("s1".to_string()),
            ..Session::default()
        };
        session.clear_attempt_lineage();

        assert_eq!(session.session_id, None);
        assert!(session.attempt_snapshots.is_empty());
        assert_eq!(session.selected_left_attempt_id, None);
        assert_eq!(session.hydrated_for.as_deref(), Some("s1"));
    }

    #[test]
    fn test_attempt_diff_uses_selected_pair() {
        let mut state = WorkspaceState::default();
        assert!(state.attempt_diff().is_empty());

        state.session.attempt_snapshots = vec![snapshot(1, "a\nb"), snapshot(2, "a\nb\nc")];
        state.session.selected_left_attempt_id = Some(1);
        state.session.selected_right_attempt_id = Some(2);

        let kinds: Vec<DiffKind> = state.attempt_diff().iter().map(|row| row.kind).collect();
        assert_eq!(kinds, vec![DiffKind::Same, DiffKind::Same, DiffKind::Added]);
    }
}
