//! Client core for the NeetCode practice platform.
//!
//! Turns editor contents into judge submissions: wraps user code with the
//! per-language driver, dispatches Run/Submit, follows the verdict with a
//! cancellable poll loop, and maps the result to a display model.

pub mod client;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod poller;
pub mod render;
pub mod session;
pub mod templates;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use client::{ApiClient, ExecutionBackend, ProblemBackend, SubmissionBackend};
pub use config::{ClientConfig, PollConfig};
pub use context::AppContext;
pub use error::{ClientError, ClientResult};
pub use session::{ExecutionSession, RunRequest, SubmitRequest};
pub use types::Language;
