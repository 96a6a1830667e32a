/// Result Renderer
///
/// Pure mapping from session state to what the output panel shows. Nothing
/// here performs I/O; the CLI prints the `Display` form.

use crate::session::{OutputMode, SessionState};
use crate::types::{ExecutionResult, FailureDetails, Submission, SubmissionStatus};
use std::fmt;

pub const RUN_PLACEHOLDER: &str = "Run code to see output...";
pub const RUNNING: &str = "Running...";
pub const NO_OUTPUT: &str = "No output";
pub const EXECUTION_FAILED: &str = "Execution failed";
pub const JUDGING: &str = "Judging...";
pub const STILL_JUDGING: &str = "Still judging, check back later";

/// Text shown for a settled Run: stdout, else stderr, else compiler output.
pub fn run_output(result: Option<&ExecutionResult>) -> String {
    result
        .and_then(|r| {
            [&r.stdout, &r.stderr, &r.compile_output]
                .into_iter()
                .flatten()
                .find(|s| !s.is_empty())
        })
        .cloned()
        .unwrap_or_else(|| NO_OUTPUT.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusGlyph {
    Spinner,
    Success,
    Failure,
}

impl StatusGlyph {
    pub fn symbol(&self) -> &'static str {
        match self {
            StatusGlyph::Spinner => "⟳",
            StatusGlyph::Success => "✓",
            StatusGlyph::Failure => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionView {
    pub glyph: StatusGlyph,
    pub label: String,
    /// "passed/total"
    pub cases: Option<String>,
    pub score: Option<f64>,
    pub failure: Option<FailureDetails>,
    pub still_judging: bool,
}

impl SubmissionView {
    pub fn new(submission: &Submission, still_judging: bool) -> Self {
        let status = submission.status;
        let glyph = if !status.is_terminal() {
            StatusGlyph::Spinner
        } else if status == SubmissionStatus::Accepted {
            StatusGlyph::Success
        } else {
            StatusGlyph::Failure
        };
        let label = if status.is_terminal() {
            status.label().to_string()
        } else {
            JUDGING.to_string()
        };
        let cases = submission.test_cases_passed.map(|passed| match submission.total_test_cases {
            Some(total) => format!("{}/{}", passed, total),
            None => format!("{}/?", passed),
        });

        Self {
            glyph,
            label,
            cases,
            score: submission.score,
            failure: submission.failure_details.clone(),
            still_judging,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.glyph == StatusGlyph::Success
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputView {
    /// Nothing has been run or submitted
    Empty,
    Run(String),
    Submission(SubmissionView),
}

impl OutputView {
    pub fn from_state(state: &SessionState) -> Self {
        match state.mode {
            Some(OutputMode::Submit) => match &state.submission {
                Some(sub) => OutputView::Submission(SubmissionView::new(sub, state.still_judging)),
                None => OutputView::Empty,
            },
            Some(OutputMode::Run) if !state.run_output.is_empty() => {
                OutputView::Run(state.run_output.clone())
            }
            _ => OutputView::Empty,
        }
    }
}

impl fmt::Display for SubmissionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.glyph.symbol(), self.label)?;

        let mut stats = Vec::new();
        if let Some(cases) = &self.cases {
            stats.push(format!("Cases: {}", cases));
        }
        if let Some(score) = self.score {
            stats.push(format!("Score: {}", score));
        }
        if !stats.is_empty() {
            write!(f, "\n  {}", stats.join("  "))?;
        }

        if self.still_judging {
            write!(f, "\n  {}", STILL_JUDGING)?;
        }

        if let Some(failure) = &self.failure {
            write!(f, "\n\n⚠ Failed Case")?;
            write!(f, "\nInput:\n{}", failure.input)?;
            write!(f, "\nExpected:\n{}", failure.expected)?;
            write!(f, "\nYour Output:\n{}", failure.output)?;
        }
        Ok(())
    }
}

impl fmt::Display for OutputView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputView::Empty => f.write_str(RUN_PLACEHOLDER),
            OutputView::Run(output) => f.write_str(output),
            OutputView::Submission(view) => write!(f, "{}", view),
        }
    }
}
