use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the editor can dispatch to the execution judge.
///
/// The judge identifiers are fixed; a tag that does not parse into this enum
/// is unsupported and must never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Java,
    Cpp,
    C,
    TypeScript,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::TypeScript,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "javascript" => Some(Language::JavaScript),
            "python" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cpp" => Some(Language::Cpp),
            "c" => Some(Language::C),
            "typescript" => Some(Language::TypeScript),
            _ => None,
        }
    }

    /// Wire tag used by the submission service.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::TypeScript => "typescript",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::TypeScript => "TypeScript",
        }
    }

    /// Language identifier understood by the execution judge.
    pub fn judge_id(&self) -> u32 {
        match self {
            Language::JavaScript => 63,
            Language::Python => 71,
            Language::Java => 62,
            Language::Cpp => 54,
            Language::C => 11,
            Language::TypeScript => 74,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Milliseconds
    #[serde(default)]
    pub time_limit: u64,
    /// Megabytes
    #[serde(default)]
    pub memory_limit: u64,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Problem {
    /// First language the problem lists that the judge can run.
    pub fn default_language(&self) -> Option<Language> {
        self.languages.iter().find_map(|l| Language::from_str(l))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub problem_id: Option<String>,
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub is_sample: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Running,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    CompileError,
    RuntimeError,
}

impl SubmissionStatus {
    /// Only the server moves a submission out of pending/running.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending | SubmissionStatus::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Running => "Running",
            SubmissionStatus::Accepted => "Accepted",
            SubmissionStatus::WrongAnswer => "Wrong Answer",
            SubmissionStatus::TimeLimitExceeded => "Time Limit Exceeded",
            SubmissionStatus::MemoryLimitExceeded => "Memory Limit Exceeded",
            SubmissionStatus::CompileError => "Compile Error",
            SubmissionStatus::RuntimeError => "Runtime Error",
        }
    }
}

/// First failing test case, when the server chooses to reveal it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetails {
    pub input: String,
    pub expected: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub problem_id: Option<String>,
    #[serde(default)]
    pub mcq_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub test_cases_passed: Option<u32>,
    #[serde(default)]
    pub total_test_cases: Option<u32>,
    /// Milliseconds
    #[serde(default)]
    pub execution_time: Option<f64>,
    /// Kilobytes
    #[serde(default)]
    pub memory_used: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub failure_details: Option<FailureDetails>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Body of `POST submissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub problem_id: String,
    pub code: String,
    pub language: String,
}

/// Body of `POST execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub language_id: u32,
    pub stdin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeStatus {
    pub id: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl JudgeStatus {
    pub const IN_QUEUE: u32 = 1;
    pub const PROCESSING: u32 = 2;
}

/// Judge payload for a Run. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub status: Option<JudgeStatus>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
}

impl ExecutionResult {
    /// A missing status counts as settled.
    pub fn is_terminal(&self) -> bool {
        match &self.status {
            Some(s) => s.id != JudgeStatus::IN_QUEUE && s.id != JudgeStatus::PROCESSING,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Dsa,
    Practice,
    Mcq,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    pub problem: Problem,
    #[serde(default)]
    pub sample_test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemPage {
    pub problems: Vec<Problem>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPage {
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub pagination: Pagination,
}
