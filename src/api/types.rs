//! Wire types exchanged with the practice backend.
//!
//! Field names follow the backend's camelCase JSON. The analysis timeline is
//! the one exception: its entries are produced by the analysis service with
//! snake_case keys and are kept that way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::description::{parse_problem_description, ParsedProblemDescription};

/// Problem difficulty as labelled by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "invalid difficulty '{}': must be 'easy', 'medium', or 'hard'",
                other
            )),
        }
    }
}

/// Worked example attached to a problem by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemExample {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Test case whose input and expected output are shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleTestCase {
    pub id: String,
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Full problem record returned by `GET /problems/:slug`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub summary: String,
    /// Raw statement blob; see [`ProblemDetail::parsed_description`].
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub starter_code: String,
    #[serde(default)]
    pub examples: Vec<ProblemExample>,
    #[serde(default)]
    pub visible_tests: Vec<VisibleTestCase>,
}

impl ProblemDetail {
    pub fn parsed_description(&self) -> ParsedProblemDescription {
        parse_problem_description(&self.description)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProblemDetailResponse {
    pub problem: ProblemDetail,
}

/// Catalog entry returned by `GET /problems`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub concepts: Vec<String>,
}

/// One page of the problem catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemPage {
    pub problems: Vec<ProblemSummary>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Filters for `GET /problems`. Unset fields are left to backend defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
    pub concept: Option<String>,
}

impl ProblemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    /// Query-string pairs for the set filters, in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            pairs.push(("difficulty", difficulty.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.trim().to_string()));
        }
        if let Some(concept) = self.concept.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("concept", concept.trim().to_string()));
        }
        pairs
    }

    /// Encoded query string including the leading `?`, or empty when no filter is set.
    pub fn to_query_string(&self) -> String {
        let pairs = self.to_query_pairs();
        if pairs.is_empty() {
            return String::new();
        }
        let encoded: Vec<String> = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        format!("?{}", encoded.join("&"))
    }
}

/// Execution language offered by the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: u32,
    pub name: String,
}

impl Language {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LanguagesResponse {
    #[serde(default)]
    pub languages: Vec<Language>,
}

/// Verdict over a whole run or submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Accepted,
    Failed,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Accepted => "accepted",
            OverallStatus::Failed => "failed",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, OverallStatus::Accepted)
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single test case as reported by the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTestResult {
    pub id: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
    pub passed: bool,
    pub status_id: u32,
    pub status_description: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub memory: Option<u64>,
}

/// Problem header echoed back by the run endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProblemInfo {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub concepts: Vec<String>,
}

/// Body of `POST /problems/:slug/run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub code: String,
    pub language_id: u32,
}

/// Result of running the visible tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub problem: RunProblemInfo,
    pub overall_status: OverallStatus,
    pub passed_count: u32,
    pub total_count: u32,
    #[serde(default)]
    pub tests: Vec<ExecutionTestResult>,
}

/// Body of `POST /problems/:slug/submit`.
///
/// `session_id` is only sent when extending an existing attempt lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub code: String,
    pub language_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Attempt verdict as stored by the backend.
///
/// Unrecognised values are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttemptStatus {
    Accepted,
    WrongAnswer,
    RuntimeError,
    CompilationError,
    TimeLimitExceeded,
    Failed,
    Other(String),
}

impl AttemptStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AttemptStatus::Accepted => "accepted",
            AttemptStatus::WrongAnswer => "wrong_answer",
            AttemptStatus::RuntimeError => "runtime_error",
            AttemptStatus::CompilationError => "compilation_error",
            AttemptStatus::TimeLimitExceeded => "time_limit_exceeded",
            AttemptStatus::Failed => "failed",
            AttemptStatus::Other(raw) => raw,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, AttemptStatus::Accepted)
    }
}

impl From<String> for AttemptStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "accepted" => AttemptStatus::Accepted,
            "wrong_answer" => AttemptStatus::WrongAnswer,
            "runtime_error" => AttemptStatus::RuntimeError,
            "compilation_error" | "compile_error" => AttemptStatus::CompilationError,
            "time_limit_exceeded" => AttemptStatus::TimeLimitExceeded,
            "failed" => AttemptStatus::Failed,
            _ => AttemptStatus::Other(raw),
        }
    }
}

impl From<AttemptStatus> for String {
    fn from(status: AttemptStatus) -> Self {
        match status {
            AttemptStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attempt record included in a submit response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAttempt {
    pub id: i64,
    pub status: AttemptStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Result of a full (visible + hidden) evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub session_id: String,
    pub overall_status: OverallStatus,
    pub passed_count: u32,
    pub total_count: u32,
    #[serde(default)]
    pub tests: Vec<ExecutionTestResult>,
    pub attempt: SubmittedAttempt,
}

impl SubmitResponse {
    pub fn visible_tests(&self) -> impl Iterator<Item = &ExecutionTestResult> {
        self.tests.iter().filter(|test| !test.is_hidden)
    }

    pub fn hidden_tests(&self) -> impl Iterator<Item = &ExecutionTestResult> {
        self.tests.iter().filter(|test| test.is_hidden)
    }

    /// `(passed, total)` over hidden tests only.
    pub fn hidden_pass_ratio(&self) -> (usize, usize) {
        self.hidden_tests().fold((0, 0), |(passed, total), test| {
            (passed + usize::from(test.passed), total + 1)
        })
    }
}

/// Cached copy of one submitted code revision within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSnapshot {
    pub id: i64,
    pub code: String,
    pub status: AttemptStatus,
    #[serde(default)]
    pub error_type: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Per-concept evidence gathered across a session's attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptStat {
    pub count: u32,
    pub confidence: f64,
}

/// One entry of the analysis timeline (snake_case on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub attempt_id: i64,
    pub status: String,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lines_added: Option<u32>,
    #[serde(default)]
    pub lines_removed: Option<u32>,
    #[serde(default)]
    pub change_summary: Option<String>,
}

/// Analysis generated for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalysis {
    pub id: i64,
    pub session_id: String,
    pub summary: String,
    #[serde(default)]
    pub concept_breakdown: BTreeMap<String, ConceptStat>,
    #[serde(default)]
    pub attempt_timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub time_complexity: Option<String>,
    #[serde(default)]
    pub analysis_mode: Option<String>,
    #[serde(default)]
    pub llm_provider: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response of both the generate and the fetch analysis endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: SessionAnalysis,
    #[serde(default)]
    pub attempts: Vec<AttemptSnapshot>,
}

/// Response of `POST /auth/session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSessionResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_detail_deserializes_with_defaults() {
        let json = r#"{
            "id": 7,
            "slug": "two-sum",
            "title": "Two Sum",
            "difficulty": "Easy",
            "description": "Find two numbers.",
            "starterCode": "print()"
        }"#;

        let problem: ProblemDetail = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(problem.slug, "two-sum");
        assert_eq!(problem.difficulty, Difficulty::Easy);
        assert_eq!(problem.starter_code, "print()");
        assert!(problem.visible_tests.is_empty());
        assert_eq!(
            problem.parsed_description().statement_paragraphs,
            vec!["Find two numbers."]
        );
    }

    #[test]
    fn test_submit_request_omits_missing_session() {
        let request = SubmitRequest {
            code: "x".to_string(),
            language_id: 71,
            session_id: None,
        };
        let json = serde_json::to_string(&request).expect("serialization should succeed");
        assert!(json.contains("\"languageId\":71"));
        assert!(!json.contains("sessionId"));

        let request = SubmitRequest {
            session_id: Some("s1".to_string()),
            ..request
        };
        let json = serde_json::to_string(&request).expect("serialization should succeed");
        assert!(json.contains("\"sessionId\":\"s1\""));
    }

    #[test]
    fn test_attempt_status_parsing() {
        assert_eq!(
            AttemptStatus::from("ACCEPTED".to_string()),
            AttemptStatus::Accepted
        );
        assert_eq!(
            AttemptStatus::from("Wrong Answer".to_string()),
            AttemptStatus::WrongAnswer
        );
        assert_eq!(
            AttemptStatus::from("memory_limit".to_string()),
            AttemptStatus::Other("memory_limit".to_string())
        );
        assert_eq!(String::from(AttemptStatus::TimeLimitExceeded), "time_limit_exceeded");
    }

    #[test]
    fn test_attempt_snapshot_deserializes() {
        let json = r#"{
            "id": 3,
            "code": "print(1)",
            "status": "runtime_error",
            "errorType": "INDEX_ERROR",
            "submittedAt": "2024-05-01T10:00:00Z"
        }"#;

        let snapshot: AttemptSnapshot = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(snapshot.status, AttemptStatus::RuntimeError);
        assert_eq!(snapshot.error_type.as_deref(), Some("INDEX_ERROR"));
    }

    #[test]
    fn test_analysis_timeline_uses_snake_case() {
        let json = r#"{
            "analysis": {
                "id": 1,
                "sessionId": "s1",
                "summary": "Good progress",
                "conceptBreakdown": {"arrays": {"count": 2, "confidence": 0.8}},
                "attemptTimeline": [
                    {"attempt_id": 4, "status": "failed", "error_type": null,
                     "submitted_at": "2024-05-01T10:00:00Z", "lines_added": 3}
                ],
                "recommendations": ["Use a hash map"],
                "timeComplexity": "O(n)",
                "createdAt": "2024-05-01T10:05:00Z"
            },
            "attempts": []
        }"#;

        let response: AnalyzeResponse = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(response.analysis.attempt_timeline[0].attempt_id, 4);
        assert_eq!(response.analysis.attempt_timeline[0].lines_added, Some(3));
        assert_eq!(response.analysis.concept_breakdown["arrays"].count, 2);
        assert_eq!(response.analysis.time_complexity.as_deref(), Some("O(n)"));
    }

    #[test]
    fn test_hidden_pass_ratio() {
        let test = |id: &str, hidden: bool, passed: bool| ExecutionTestResult {
            id: id.to_string(),
            note: None,
            is_hidden: hidden,
            passed,
            status_id: if passed { 3 } else { 4 },
            status_description: (if passed { "Accepted" } else { "Wrong Answer" }).to_string(),
            input: String::new(),
            expected_output: String::new(),
            stdout: None,
            stderr: None,
            compile_output: None,
            time: None,
            memory: None,
        };

        let response = SubmitResponse {
            session_id: "s1".to_string(),
            overall_status: OverallStatus::Failed,
            passed_count: 2,
            total_count: 4,
            tests: vec![
                test("v1", false, true),
                test("h1", true, true),
                test("h2", true, false),
                test("h3", true, false),
            ],
            attempt: SubmittedAttempt {
                id: 1,
                status: AttemptStatus::Failed,
                submitted_at: Utc::now(),
            },
        };

        assert_eq!(response.visible_tests().count(), 1);
        assert_eq!(response.hidden_pass_ratio(), (1, 3));
    }

    #[test]
    fn test_problem_query_pairs() {
        let query = ProblemQuery::new()
            .with_page(2)
            .with_difficulty(Difficulty::Hard)
            .with_search("  graph ");
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("difficulty", "Hard".to_string()),
                ("search", "graph".to_string()),
            ]
        );
        assert!(ProblemQuery::new().to_query_pairs().is_empty());
        assert_eq!(ProblemQuery::new().to_query_string(), "");
        assert_eq!(
            ProblemQuery::new()
                .with_limit(10)
                .with_concept("two pointers")
                .to_query_string(),
            "?limit=10&concept=two%20pointers"
        );
    }
}
