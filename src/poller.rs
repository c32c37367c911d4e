//! Run lifecycle polling.
//!
//! A run is created against a thread, then its status is checked immediately
//! and after every fixed interval until it is terminal. Each run gets its own
//! cancellation token; the loop is bounded by an attempt count and an
//! optional deadline.

use crate::client::AssistantsApi;
use crate::config::PollConfig;
use crate::types::{Message, RunStatus};
use crate::{Error, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Upper bound on the best-effort cancel request sent after a local stop.
const REMOTE_CANCEL_TIMEOUT: Duration = Duration::from_secs(5);

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run completed; the thread history in chronological order.
    Completed(Vec<Message>),
    /// The run reached a failure terminal status.
    Failed {
        status: RunStatus,
        message: Option<String>,
    },
    /// The attempt budget or deadline ran out before a terminal status.
    TimedOut { attempts: u32, elapsed: Duration },
    /// The client cancelled the run.
    Cancelled,
}

impl RunOutcome {
    pub fn into_result(self) -> Result<Vec<Message>> {
        match self {
            RunOutcome::Completed(messages) => Ok(messages),
            RunOutcome::Failed { status, message } => Err(Error::RunFailed {
                status: status.to_string(),
                message,
            }),
            RunOutcome::TimedOut { attempts, elapsed } => Err(Error::TimedOut {
                attempts,
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            }),
            RunOutcome::Cancelled => Err(Error::Cancelled),
        }
    }
}

/// Cancels whichever run is currently being polled.
///
/// Cheap to clone and safe to use from another task. A cancel issued while no
/// run is in flight has no effect on later runs.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the in-flight run. Returns `false` when no run was in flight.
    pub fn cancel(&self) -> bool {
        match self.current.lock() {
            Ok(current) => match current.as_ref() {
                Some(token) => {
                    token.cancel();
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .map(|current| current.is_some())
            .unwrap_or(false)
    }

    /// Install a fresh token for a new run and return it.
    pub(crate) fn begin_run(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = Some(token.clone());
        }
        token
    }

    pub(crate) fn end_run(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}

pub struct RunPoller {
    config: PollConfig,
}

impl RunPoller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Create a run for `assistant_id` on `thread_id` and poll it to the end.
    pub async fn execute(
        &self,
        api: &dyn AssistantsApi,
        thread_id: &str,
        assistant_id: &str,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome> {
        self.config.validate()?;
        let run = api.create_run(thread_id, assistant_id).await?;
        self.wait(api, thread_id, &run.id, cancel).await
    }

    /// Poll an existing run until it is terminal, cancelled or out of budget.
    pub async fn wait(
        &self,
        api: &dyn AssistantsApi,
        thread_id: &str,
        run_id: &str,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome> {
        let started = Instant::now();
        let expires_at = self.config.deadline.and_then(|d| started.checked_add(d));
        let mut attempts: u32 = 0;

        loop {
            let run = tokio::select! {
                _ = cancel.cancelled() => {
                    Self::cancel_remote(api, thread_id, run_id).await;
                    return Ok(RunOutcome::Cancelled);
                }
                _ = Self::expiry(expires_at) => {
                    return Ok(Self::time_out(api, thread_id, run_id, attempts, started).await);
                }
                run = api.retrieve_run(thread_id, run_id) => run?,
            };
            attempts += 1;
            debug!(thread_id, run_id, attempt = attempts, status = %run.status, "polled run");

            if run.status.is_success() {
                let history = tokio::select! {
                    _ = Self::expiry(expires_at) => {
                        return Ok(Self::time_out(api, thread_id, run_id, attempts, started).await);
                    }
                    history = api.list_messages(thread_id) => history?,
                };
                let messages = Message::from_history(history);
                info!(thread_id, run_id, attempts, count = messages.len(), "run completed");
                return Ok(RunOutcome::Completed(messages));
            }
            if run.status.is_failure() {
                warn!(thread_id, run_id, status = %run.status, "run ended without completing");
                return Ok(RunOutcome::Failed {
                    status: run.status,
                    message: run.last_error.and_then(|e| e.message),
                });
            }

            let past_deadline = expires_at.is_some_and(|at| Instant::now() >= at);
            if attempts >= self.config.max_attempts || past_deadline {
                return Ok(Self::time_out(api, thread_id, run_id, attempts, started).await);
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    Self::cancel_remote(api, thread_id, run_id).await;
                    return Ok(RunOutcome::Cancelled);
                }
                _ = Self::expiry(expires_at) => {
                    return Ok(Self::time_out(api, thread_id, run_id, attempts, started).await);
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }

    /// Resolves at the deadline, or never when there is none.
    async fn expiry(expires_at: Option<Instant>) {
        match expires_at {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    }

    async fn time_out(
        api: &dyn AssistantsApi,
        thread_id: &str,
        run_id: &str,
        attempts: u32,
        started: Instant,
    ) -> RunOutcome {
        let elapsed = started.elapsed();
        warn!(thread_id, run_id, attempts, elapsed_ms = %elapsed.as_millis(), "run polling timed out");
        Self::cancel_remote(api, thread_id, run_id).await;
        RunOutcome::TimedOut { attempts, elapsed }
    }

    /// Best effort: the local outcome does not depend on the service honouring it.
    async fn cancel_remote(api: &dyn AssistantsApi, thread_id: &str, run_id: &str) {
        match tokio::time::timeout(REMOTE_CANCEL_TIMEOUT, api.cancel_run(thread_id, run_id)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(thread_id, run_id, error = %e, "remote run cancel failed"),
            Err(_) => warn!(thread_id, run_id, "remote run cancel timed out"),
        }
    }
}
