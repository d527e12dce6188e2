//! Events fed into the reducer and effects it asks the controller to perform.

use crate::api::{
    AnalyzeResponse, Language, ProblemDetail, RunRequest, RunResponse, SubmitRequest,
    SubmitResponse,
};
use crate::error::ApiError;

/// Session id handed to the workspace from outside, e.g. a dashboard link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub session_id: String,
    /// Load the saved analysis (or generate one) as soon as the session is adopted.
    pub auto_analyze: bool,
}

impl SessionRequest {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            auto_analyze: false,
        }
    }

    pub fn with_auto_analyze(mut self, auto_analyze: bool) -> Self {
        self.auto_analyze = auto_analyze;
        self
    }
}

/// Problem plus the language list fetched alongside it.
///
/// An empty `languages` means the list was unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProblem {
    pub problem: ProblemDetail,
    pub languages: Vec<Language>,
}

/// Which endpoint produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    /// `POST /sessions/:id/analyze`
    Generated,
    /// `GET /sessions/:id/analysis`
    Saved,
}

#[derive(Debug, Clone)]
pub enum WorkspaceEvent {
    // User actions.
    LoadProblem {
        slug: String,
        requested_session: Option<SessionRequest>,
    },
    RequestSession(SessionRequest),
    ChangeLanguage(u32),
    ResetStarter,
    EditCode(String),
    SetAuthToken(Option<String>),
    Run,
    Submit,
    Analyze,
    SelectLeftAttempt(i64),
    SelectRightAttempt(i64),

    // Completions, tagged with the identity they were issued for.
    ProblemLoaded {
        generation: u64,
        slug: String,
        result: Result<LoadedProblem, ApiError>,
    },
    RunFinished {
        lineage: u64,
        result: Result<RunResponse, ApiError>,
    },
    SubmitFinished {
        lineage: u64,
        result: Result<SubmitResponse, ApiError>,
    },
    AnalysisFinished {
        lineage: u64,
        session_id: String,
        source: AnalysisSource,
        result: Result<AnalyzeResponse, ApiError>,
    },
}

/// Network work requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEffect {
    FetchProblem {
        generation: u64,
        slug: String,
    },
    RunVisibleTests {
        lineage: u64,
        slug: String,
        request: RunRequest,
    },
    SubmitSolution {
        lineage: u64,
        slug: String,
        request: SubmitRequest,
        token: String,
    },
    GenerateAnalysis {
        lineage: u64,
        session_id: String,
        token: String,
    },
    FetchSavedAnalysis {
        lineage: u64,
        session_id: String,
        token: String,
    },
}

impl WorkspaceEffect {
    /// Short name for logs; never includes the token.
    pub fn label(&self) -> &'static str {
        match self {
            WorkspaceEffect::FetchProblem { .. } => "fetch_problem",
            WorkspaceEffect::RunVisibleTests { .. } => "run_visible_tests",
            WorkspaceEffect::SubmitSolution { .. } => "submit_solution",
            WorkspaceEffect::GenerateAnalysis { .. } => "generate_analysis",
            WorkspaceEffect::FetchSavedAnalysis { .. } => "fetch_saved_analysis",
        }
    }
}
