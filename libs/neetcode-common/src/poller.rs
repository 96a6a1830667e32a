/// Status Poller
///
/// Repeatedly queries a status source until the value it returns is terminal,
/// the attempt budget runs out, the caller asks to stop, or a query fails.
///
/// ```text
/// Unstarted -> Polling{attempt} -> Terminal | TimedOut | Cancelled | Failed
/// ```
///
/// The `observe` hook runs after every successful query and before the
/// terminal check. It is where the owner applies the value to its display and
/// where it reports that it has been superseded (`ControlFlow::Break`), so a
/// stale loop stops before it can mutate anything.

use crate::error::ClientError;
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until a terminal value arrives
    pub max_attempts: Option<u32>,
    /// Wait one interval before the first query
    pub delay_first: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Unstarted,
    Polling { attempt: u32 },
    Terminal,
    TimedOut,
    Cancelled,
    Failed,
}

#[derive(Debug)]
pub enum PollOutcome<T> {
    /// A terminal value arrived
    Settled(T),
    /// Budget exhausted; carries the last value fetched, if any
    Exhausted(Option<T>),
    /// Owner signalled it was superseded
    Cancelled,
    /// A query failed; carries the last good value, if any
    Failed { error: ClientError, last: Option<T> },
}

#[derive(Debug)]
pub struct Poller {
    policy: PollPolicy,
    state: PollState,
    attempts: u32,
}

impl Poller {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            state: PollState::Unstarted,
            attempts: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Number of queries issued so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub async fn run<T, F, Fut, P, O>(
        &mut self,
        mut fetch: F,
        is_terminal: P,
        mut observe: O,
    ) -> PollOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
        P: Fn(&T) -> bool,
        O: FnMut(&T) -> ControlFlow<()>,
    {
        let mut last: Option<T> = None;

        if self.policy.delay_first {
            tokio::time::sleep(self.policy.interval).await;
        }

        loop {
            if let Some(max) = self.policy.max_attempts {
                if self.attempts >= max {
                    debug!(attempts = self.attempts, "Poll budget exhausted");
                    self.state = PollState::TimedOut;
                    return PollOutcome::Exhausted(last);
                }
            }

            self.attempts += 1;
            self.state = PollState::Polling {
                attempt: self.attempts,
            };

            let value = match fetch().await {
                Ok(value) => value,
                Err(error) => {
                    debug!(attempt = self.attempts, error = %error, "Poll query failed");
                    self.state = PollState::Failed;
                    return PollOutcome::Failed { error, last };
                }
            };

            if observe(&value).is_break() {
                self.state = PollState::Cancelled;
                return PollOutcome::Cancelled;
            }

            if is_terminal(&value) {
                self.state = PollState::Terminal;
                return PollOutcome::Settled(value);
            }

            last = Some(value);

            // No point sleeping after the final attempt
            if self.policy.max_attempts != Some(self.attempts) {
                tokio::time::sleep(self.policy.interval).await;
            }
        }
    }
}
