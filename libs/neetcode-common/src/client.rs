// HTTP client for the NeetCode platform API and the execution judge proxy.
//
// Every request carries the bearer token when one is configured. Endpoints are
// path segments under `{api_base_url}/api`; each segment is percent-encoded,
// so ids never leak into the query string or the path structure.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::{
    ExecutionRequest, ExecutionResult, NewSubmission, ProblemDetail, ProblemPage, Submission,
    SubmissionKind, SubmissionPage,
};
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const EXECUTE_PATH: [&str; 2] = ["execute", "execute"];
pub const SUBMISSIONS_PATH: [&str; 1] = ["submissions"];
pub const MY_SUBMISSIONS_PATH: [&str; 2] = ["submissions", "me"];
pub const PROBLEMS_PATH: [&str; 1] = ["problems"];

pub fn execution_status_path(token: &str) -> [&str; 4] {
    ["execute", "execute", token, "status"]
}

pub fn submission_path(submission_id: &str) -> [&str; 2] {
    ["submissions", submission_id]
}

pub fn problem_path(problem_id: &str) -> [&str; 2] {
    ["problems", problem_id]
}

/// Ad hoc "Run" against the execution judge.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Queue source + stdin, returning the judge token
    async fn execute(&self, request: &ExecutionRequest) -> ClientResult<String>;

    async fn execution_status(&self, token: &str) -> ClientResult<ExecutionResult>;
}

/// Graded "Submit" against the platform's hidden test suite.
#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    async fn submit_code(&self, submission: &NewSubmission) -> ClientResult<Submission>;

    async fn get_submission(&self, submission_id: &str) -> ClientResult<Submission>;
}

/// Read-only problem data.
#[async_trait]
pub trait ProblemBackend: Send + Sync {
    async fn get_problem(&self, problem_id: &str) -> ClientResult<ProblemDetail>;
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    token: String,
}

#[derive(Debug, Deserialize)]
struct SubmissionEnvelope {
    submission: Submission,
}

/// Filters for `GET problems`.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProblemQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct HistoryQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SubmissionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

fn default_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    headers
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("neetcode-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        let raw = format!("{}/api", config.api_base_url.trim_end_matches('/'));
        let base_url = Url::parse(&raw)
            .map_err(|e| ClientError::Config(format!("invalid API base URL {}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("{} cannot be used as a base URL", raw)));
        }

        Ok(Self {
            client,
            base_url,
            token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append percent-encoded path segments to the API base.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("{} cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let req = self.client.request(method, self.endpoint(segments)?);
        Ok(match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Request rejected");
            return Err(ClientError::from_status(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        self.send(self.request(Method::GET, segments)?).await
    }

    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, segments)?.json(body)).await
    }

    /// `GET submissions/me`
    pub async fn my_submissions(&self, query: &HistoryQuery) -> ClientResult<SubmissionPage> {
        self.send(self.request(Method::GET, &MY_SUBMISSIONS_PATH)?.query(query)).await
    }

    /// `GET problems`
    pub async fn list_problems(&self, query: &ProblemQuery) -> ClientResult<ProblemPage> {
        self.send(self.request(Method::GET, &PROBLEMS_PATH)?.query(query)).await
    }
}

#[async_trait]
impl ExecutionBackend for ApiClient {
    #[instrument(skip(self, request), fields(language_id = request.language_id))]
    async fn execute(&self, request: &ExecutionRequest) -> ClientResult<String> {
        let envelope: TokenEnvelope = self.post_json(&EXECUTE_PATH, request).await?;
        debug!(token = %envelope.token, "Execution queued");
        Ok(envelope.token)
    }

    async fn execution_status(&self, token: &str) -> ClientResult<ExecutionResult> {
        self.get_json(&execution_status_path(token)).await
    }
}

#[async_trait]
impl SubmissionBackend for ApiClient {
    #[instrument(skip(self, submission), fields(problem_id = %submission.problem_id, language = %submission.language))]
    async fn submit_code(&self, submission: &NewSubmission) -> ClientResult<Submission> {
        let envelope: SubmissionEnvelope = self.post_json(&SUBMISSIONS_PATH, submission).await?;
        debug!(submission_id = %envelope.submission.id, "Submission created");
        Ok(envelope.submission)
    }

    async fn get_submission(&self, submission_id: &str) -> ClientResult<Submission> {
        let envelope: SubmissionEnvelope = self.get_json(&submission_path(submission_id)).await?;
        Ok(envelope.submission)
    }
}

#[async_trait]
impl ProblemBackend for ApiClient {
    async fn get_problem(&self, problem_id: &str) -> ClientResult<ProblemDetail> {
        self.get_json(&problem_path(problem_id)).await
    }
}
