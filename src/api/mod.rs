//! REST backend client and wire types.

pub mod client;
pub mod types;

pub use client::{api_error_from_body, classify_analysis_fetch_error, HttpPracticeApi, PracticeApi};
pub use types::{
    AnalyzeResponse, AttemptSnapshot, AttemptStatus, AuthSessionResponse, ConceptStat,
    Difficulty, ExecutionTestResult, Language, OverallStatus, ProblemDetail, ProblemExample,
    ProblemPage, ProblemQuery, ProblemSummary, RunProblemInfo, RunRequest, RunResponse,
    SessionAnalysis, SubmitRequest, SubmitResponse, SubmittedAttempt, TimelineEntry,
    VisibleTestCase,
};
