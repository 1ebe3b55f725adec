//! Status polling.
//!
//! A small state machine over [`JobHandle::status`]: fetch, classify, sleep,
//! repeat. One call owns one loop; there is never more than a single status
//! fetch in flight, and the only way to cancel is the wall-clock budget in
//! [`WaitOptions`].
//!
//! Classification order matters and is fixed:
//!
//! 1. the target status always wins, even if it is also terminal;
//! 2. a fatal terminal status ends the wait with [`Error::TerminalStatus`];
//! 3. `completed` resolves successfully even when it was not the target —
//!    a completed job cannot reach any further status, so waiting longer
//!    would hang forever;
//! 4. an exhausted budget ends the wait with [`Error::PollTimeout`].

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::error::Error;
use crate::job::JobHandle;
use crate::types::JobStatus;

/// Pacing and budget for one wait-for-status call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between status fetches. Defaults to one second.
    pub interval: Duration,
    /// Wall-clock budget measured from the start of the call. `None` waits
    /// for as long as it takes.
    pub timeout: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            timeout: None,
        }
    }
}

impl WaitOptions {
    /// Sets the poll interval, returning the modified options.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the wall-clock budget, returning the modified options.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Drives the polling loop for [`JobHandle::wait_for_status`].
pub(crate) async fn wait_for_status(
    handle: &JobHandle,
    target: JobStatus,
    options: WaitOptions,
) -> Result<JobStatus, Error> {
    let started = Instant::now();

    loop {
        let status = handle.status().await?;
        debug!(job_id = handle.id(), status = %status, target = %target, "poll tick");

        if status == target {
            return Ok(status);
        }
        if status.is_terminal() {
            if status.is_fatal() {
                return Err(Error::TerminalStatus {
                    job_id: handle.id().to_string(),
                    status,
                    target,
                });
            }
            // Completed: nothing further can happen, resolve with what we have.
            return Ok(status);
        }
        if let Some(budget) = options.timeout {
            let waited = started.elapsed();
            if waited >= budget {
                return Err(Error::PollTimeout {
                    job_id: handle.id().to_string(),
                    target,
                    waited,
                });
            }
        }

        tokio::time::sleep(options.interval).await;
    }
}
