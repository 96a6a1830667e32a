/// Execution Session - one editor's Run/Submit lifecycle
///
/// **Responsibility:**
/// Own everything a single problem attempt shows in its output panel: the Run
/// output, the tracked Submission, and the poll loop feeding either of them.
///
/// **Ownership rules:**
/// - At most one poll loop per session. Starting a Run or Submit aborts the
///   previous loop and bumps the session generation.
/// - Every write coming from a poll loop is tagged with the generation it was
///   started under and is dropped if the session has moved on, so the latest
///   action always wins.
/// - `clear` resets the panel and stops the loop; dropping the session stops it too.
///
/// State is published through a `watch` channel so a renderer can follow it.

use crate::client::{ExecutionBackend, SubmissionBackend};
use crate::config::PollConfig;
use crate::driver::compose;
use crate::error::{ClientError, ClientResult};
use crate::poller::{PollOutcome, Poller};
use crate::render::{self, OutputView};
use crate::types::{ExecutionRequest, ExecutionResult, Language, NewSubmission, Submission, SubmissionStatus, TestCase};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

pub const SUBMITTED: &str = "Code submitted successfully!";
pub const ACCEPTED: &str = "Solution Accepted!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Run,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for the execute/submit call to return
    Dispatching,
    Polling,
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// User-facing notification, the terminal equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Bumped by every Run, Submit and clear
    pub generation: u64,
    pub mode: Option<OutputMode>,
    pub phase: Phase,
    pub run_output: String,
    pub submission: Option<Submission>,
    /// Submit poll budget ran out before the verdict arrived
    pub still_judging: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub code: String,
    pub language: String,
    pub custom_input: Option<String>,
    pub sample_tests: Vec<TestCase>,
}

#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub problem_id: String,
    pub code: String,
    pub language: String,
}

/// Stdin for a Run: custom input, else the first sample's input, else empty.
pub fn select_stdin(custom_input: Option<&str>, samples: &[TestCase]) -> String {
    custom_input
        .filter(|s| !s.is_empty())
        .or_else(|| samples.first().map(|t| t.input.as_str()))
        .unwrap_or_default()
        .to_string()
}

fn is_current(state: &watch::Sender<SessionState>, generation: u64) -> bool {
    state.borrow().generation == generation
}

/// Apply `f` only if the session is still on `generation`.
fn apply<F>(state: &watch::Sender<SessionState>, generation: u64, f: F) -> bool
where
    F: FnOnce(&mut SessionState),
{
    state.send_if_modified(|s| {
        if s.generation != generation {
            return false;
        }
        f(s);
        true
    })
}

pub struct ExecutionSession<B> {
    backend: Arc<B>,
    poll: PollConfig,
    state: Arc<watch::Sender<SessionState>>,
    poll_task: Option<JoinHandle<()>>,
}

impl<B> ExecutionSession<B>
where
    B: ExecutionBackend + SubmissionBackend + 'static,
{
    pub fn new(backend: Arc<B>, poll: PollConfig) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self {
            backend,
            poll,
            state: Arc::new(tx),
            poll_task: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> OutputView {
        OutputView::from_state(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// True while a poll loop is alive
    pub fn is_polling(&self) -> bool {
        self.poll_task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Wait until nothing is dispatching or polling.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|s| !s.phase.is_busy()).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// Ad hoc execution of the editor contents against one stdin.
    #[instrument(skip(self, request), fields(language = %request.language))]
    pub async fn run(&mut self, request: RunRequest) -> ClientResult<()> {
        let Some(language) = Language::from_str(&request.language) else {
            return Err(self.reject(&request.language));
        };

        let execution = ExecutionRequest {
            source_code: compose(&request.code, language),
            language_id: language.judge_id(),
            stdin: select_stdin(request.custom_input.as_deref(), &request.sample_tests),
        };
        let generation = self.begin(OutputMode::Run, render::RUNNING);

        let token = match self.backend.execute(&execution).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Run dispatch failed");
                apply(&self.state, generation, |s| {
                    s.run_output = render::EXECUTION_FAILED.to_string();
                    s.phase = Phase::Idle;
                    s.notice = Some(Notice::Error(e.to_string()));
                });
                return Err(e);
            }
        };

        info!(token = %token, stdin_bytes = execution.stdin.len(), "Run dispatched");
        apply(&self.state, generation, |s| s.phase = Phase::Polling);

        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);
        let policy = self.poll.run_policy();

        self.poll_task = Some(tokio::spawn(async move {
            let backend = &*backend;
            let state_ref = &*state;
            let token_ref = token.as_str();
            let mut poller = Poller::new(policy);

            let outcome = poller
                .run(
                    move || backend.execution_status(token_ref),
                    ExecutionResult::is_terminal,
                    move |_| {
                        if is_current(state_ref, generation) {
                            ControlFlow::Continue(())
                        } else {
                            ControlFlow::Break(())
                        }
                    },
                )
                .await;

            let output = match outcome {
                PollOutcome::Settled(result) => render::run_output(Some(&result)),
                PollOutcome::Exhausted(last) => {
                    warn!(token = %token, attempts = poller.attempts(), "Run did not settle within the poll budget");
                    render::run_output(last.as_ref())
                }
                PollOutcome::Failed { error, .. } => {
                    warn!(token = %token, error = %error, "Run status query failed");
                    render::EXECUTION_FAILED.to_string()
                }
                PollOutcome::Cancelled => return,
            };

            debug!(token = %token, attempts = poller.attempts(), "Run settled");
            apply(&state, generation, |s| {
                s.run_output = output;
                s.phase = Phase::Idle;
            });
        }));

        Ok(())
    }

    /// Graded submission. Returns the record the server created.
    #[instrument(skip(self, request), fields(problem_id = %request.problem_id, language = %request.language))]
    pub async fn submit(&mut self, request: SubmitRequest) -> ClientResult<Submission> {
        let Some(language) = Language::from_str(&request.language) else {
            return Err(self.reject(&request.language));
        };

        let body = NewSubmission {
            problem_id: request.problem_id,
            code: compose(&request.code, language),
            language: language.tag().to_string(),
        };
        let generation = self.begin(OutputMode::Submit, "");

        let submission = match self.backend.submit_code(&body).await {
            Ok(submission) => submission,
            Err(e) => {
                warn!(error = %e, "Submit dispatch failed");
                apply(&self.state, generation, |s| {
                    s.mode = None;
                    s.phase = Phase::Idle;
                    s.notice = Some(Notice::Error(e.to_string()));
                });
                return Err(e);
            }
        };

        info!(submission_id = %submission.id, status = ?submission.status, "Submission created");

        apply(&self.state, generation, |s| {
            s.submission = Some(submission.clone());
            s.phase = Phase::Polling;
            s.notice = Some(Notice::Success(SUBMITTED.to_string()));
        });

        if submission.status.is_terminal() {
            settle_submission(&self.state, generation, submission.clone());
            return Ok(submission);
        }

        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);
        let policy = self.poll.submit_policy();
        let submission_id = submission.id.clone();

        self.poll_task = Some(tokio::spawn(async move {
            let backend = &*backend;
            let state_ref = &*state;
            let id_ref = submission_id.as_str();
            let mut poller = Poller::new(policy);

            let outcome = poller
                .run(
                    move || backend.get_submission(id_ref),
                    |s: &Submission| s.status.is_terminal(),
                    move |latest| {
                        let applied = apply(state_ref, generation, |s| {
                            s.submission = Some(latest.clone());
                        });
                        if applied {
                            ControlFlow::Continue(())
                        } else {
                            ControlFlow::Break(())
                        }
                    },
                )
                .await;

            match outcome {
                PollOutcome::Settled(latest) => {
                    debug!(submission_id = %submission_id, attempts = poller.attempts(), "Submission settled");
                    settle_submission(&state, generation, latest);
                }
                PollOutcome::Exhausted(_) => {
                    warn!(submission_id = %submission_id, attempts = poller.attempts(), "Submission still judging");
                    apply(&state, generation, |s| {
                        s.still_judging = true;
                        s.phase = Phase::Idle;
                        s.notice = Some(Notice::Info(render::STILL_JUDGING.to_string()));
                    });
                }
                PollOutcome::Failed { error, .. } => {
                    warn!(submission_id = %submission_id, error = %error, "Submission status query failed");
                    apply(&state, generation, |s| {
                        s.phase = Phase::Idle;
                        s.notice = Some(Notice::Error(error.to_string()));
                    });
                }
                PollOutcome::Cancelled => {}
            }
        }));

        Ok(submission)
    }

    /// Reset the output panel and stop any active poll.
    pub fn clear(&mut self) {
        self.cancel_poll();
        self.state.send_modify(|s| {
            *s = SessionState {
                generation: s.generation + 1,
                ..SessionState::default()
            };
        });
    }

    fn begin(&mut self, mode: OutputMode, output: &str) -> u64 {
        self.cancel_poll();
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.mode = Some(mode);
            s.phase = Phase::Dispatching;
            s.run_output = output.to_string();
            s.submission = None;
            s.still_judging = false;
            s.notice = None;
        });
        generation
    }

    fn cancel_poll(&mut self) {
        if let Some(task) = self.poll_task.take() {
            if !task.is_finished() {
                debug!("Cancelling active poll");
            }
            task.abort();
        }
    }

    /// Unsupported language: notify, leave the panel and any poll untouched.
    fn reject(&self, tag: &str) -> ClientError {
        let error = ClientError::UnsupportedLanguage(tag.to_string());
        warn!(language = tag, "Rejected dispatch for unsupported language");
        self.state.send_modify(|s| s.notice = Some(Notice::Error(error.to_string())));
        error
    }
}

impl<B> Drop for ExecutionSession<B> {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

fn settle_submission(state: &watch::Sender<SessionState>, generation: u64, submission: Submission) {
    let accepted = submission.status == SubmissionStatus::Accepted;
    apply(state, generation, |s| {
        s.submission = Some(submission);
        s.phase = Phase::Idle;
        if accepted {
            s.notice = Some(Notice::Success(ACCEPTED.to_string()));
        }
    });
}
