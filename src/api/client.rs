//! HTTP client for the practice backend.
//!
//! [`PracticeApi`] is the seam the workspace depends on; [`HttpPracticeApi`]
//! implements it over `reqwest`. Error classification happens here: callers
//! receive a typed [`ApiError`] and never inspect message text.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::types::{
    AnalyzeResponse, AuthSessionResponse, Language, LanguagesResponse, ProblemDetail,
    ProblemDetailResponse, ProblemPage, ProblemQuery, RunRequest, RunResponse, SubmitRequest,
    SubmitResponse,
};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Error code the backend uses when a session has no saved analysis yet.
const ANALYSIS_NOT_GENERATED_CODE: &str = "analysis_not_generated";

/// Backend operations used by the workspace and the catalog.
#[async_trait]
pub trait PracticeApi: Send + Sync {
    /// `GET /problems`
    async fn list_problems(&self, query: &ProblemQuery) -> Result<ProblemPage, ApiError>;

    /// `GET /problems/:slug`
    async fn get_problem(&self, slug: &str) -> Result<ProblemDetail, ApiError>;

    /// `GET /languages`
    async fn list_languages(&self) -> Result<Vec<Language>, ApiError>;

    /// `POST /problems/:slug/run`
    async fn run_visible_tests(
        &self,
        slug: &str,
        request: &RunRequest,
    ) -> Result<RunResponse, ApiError>;

    /// `POST /problems/:slug/submit`
    async fn submit(
        &self,
        slug: &str,
        request: &SubmitRequest,
        token: &str,
    ) -> Result<SubmitResponse, ApiError>;

    /// `POST /sessions/:id/analyze`, always regenerating.
    async fn generate_analysis(
        &self,
        session_id: &str,
        token: &str,
    ) -> Result<AnalyzeResponse, ApiError>;

    /// `GET /sessions/:id/analysis`.
    ///
    /// Fails with [`ApiError::AnalysisNotGenerated`] when nothing is saved yet.
    async fn fetch_analysis(
        &self,
        session_id: &str,
        token: &str,
    ) -> Result<AnalyzeResponse, ApiError>;

    /// `POST /auth/session`
    async fn sync_auth_session(&self, token: &str) -> Result<AuthSessionResponse, ApiError>;
}

/// `PracticeApi` over HTTP.
pub struct HttpPracticeApi {
    /// Base URL for the API, without a trailing slash.
    api_base: String,
    /// HTTP client for making API requests.
    http_client: Client,
}

impl HttpPracticeApi {
    /// Creates a client from configuration.
    ///
    /// No timeout is set unless the configuration asks for one.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::NetworkFailure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn authorized(request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header("Authorization", format!("Bearer {}", token))
    }

    /// Sends a request and decodes a JSON body, mapping failures to [`ApiError`].
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Backend returned an error status");
            return Err(api_error_from_body(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Builds an [`ApiError::Api`] from a failed response.
///
/// The message is the JSON `message` field when present, otherwise the raw
/// body, otherwise a generic status message.
pub fn api_error_from_body(status: StatusCode, body: &str) -> ApiError {
    ApiError::Api {
        status: status.as_u16(),
        message: error_message(status, body),
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.trim().to_string())
        })
        .filter(|m| !m.is_empty());

    if let Some(message) = from_json {
        return message;
    }

    let raw = body.trim();
    if !raw.is_empty() {
        return raw.to_string();
    }

    format!("API request failed: {}", status.as_u16())
}

/// Narrows a failed analysis fetch to [`ApiError::AnalysisNotGenerated`] when
/// the backend signals that no analysis exists for the session.
///
/// Recognised signals: an explicit `code` field, or the "not generated"
/// wording older backends put in the message. A bare 404 is not enough, since
/// an unknown session also answers 404 and regenerating would fail too.
pub fn classify_analysis_fetch_error(error: ApiError, body: &str) -> ApiError {
    let ApiError::Api { status, message } = error else {
        return error;
    };

    let code_matches = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("code").and_then(|c| c.as_str()).map(str::to_lowercase))
        .is_some_and(|code| code == ANALYSIS_NOT_GENERATED_CODE);

    if code_matches || message.to_lowercase().contains("not generated") {
        ApiError::AnalysisNotGenerated(message)
    } else {
        ApiError::Api { status, message }
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[async_trait]
impl PracticeApi for HttpPracticeApi {
    #[instrument(skip(self))]
    async fn list_problems(&self, query: &ProblemQuery) -> Result<ProblemPage, ApiError> {
        let path = format!("/problems{}", query.to_query_string());
        let request = self.http_client.get(self.url(&path));
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn get_problem(&self, slug: &str) -> Result<ProblemDetail, ApiError> {
        let request = self
            .http_client
            .get(self.url(&format!("/problems/{}", encode(slug))));
        let response: ProblemDetailResponse = self.send_json(request).await?;
        Ok(response.problem)
    }

    #[instrument(skip(self))]
    async fn list_languages(&self) -> Result<Vec<Language>, ApiError> {
        let request = self.http_client.get(self.url("/languages"));
        let response: LanguagesResponse = self.send_json(request).await?;
        Ok(response.languages)
    }

    #[instrument(skip(self, request), fields(language_id = request.language_id))]
    async fn run_visible_tests(
        &self,
        slug: &str,
        request: &RunRequest,
    ) -> Result<RunResponse, ApiError> {
        let http_request = self
            .http_client
            .post(self.url(&format!("/problems/{}/run", encode(slug))))
            .json(request);
        self.send_json(http_request).await
    }

    #[instrument(skip(self, request, token), fields(language_id = request.language_id, session_id = ?request.session_id))]
    async fn submit(
        &self,
        slug: &str,
        request: &SubmitRequest,
        token: &str,
    ) -> Result<SubmitResponse, ApiError> {
        let http_request = Self::authorized(
            self.http_client
                .post(self.url(&format!("/problems/{}/submit", encode(slug)))),
            token,
        )
        .json(request);
        self.send_json(http_request).await
    }

    #[instrument(skip(self, token))]
    async fn generate_analysis(
        &self,
        session_id: &str,
        token: &str,
    ) -> Result<AnalyzeResponse, ApiError> {
        let http_request = Self::authorized(
            self.http_client
                .post(self.url(&format!("/sessions/{}/analyze", encode(session_id)))),
            token,
        )
        .json(&serde_json::json!({}));
        self.send_json(http_request).await
    }

    #[instrument(skip(self, token))]
    async fn fetch_analysis(
        &self,
        session_id: &str,
        token: &str,
    ) -> Result<AnalyzeResponse, ApiError> {
        let http_request = Self::authorized(
            self.http_client
                .get(self.url(&format!("/sessions/{}/analysis", encode(session_id)))),
            token,
        );

        let response = http_request
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify_analysis_fetch_error(api_error_from_body(status, &body), &body);
            debug!(status = status.as_u16(), error = %error, "Saved analysis fetch failed");
            return Err(error);
        }

        response
            .json::<AnalyzeResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    #[instrument(skip(self, token))]
    async fn sync_auth_session(&self, token: &str) -> Result<AuthSessionResponse, ApiError> {
        let http_request =
            Self::authorized(self.http_client.post(self.url("/auth/session")), token)
                .json(&serde_json::json!({}));
        self.send_json(http_request).await
    }
}
