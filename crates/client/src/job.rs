//! The per-job handle.
//!
//! [`JobHandle`] wraps a job id and proxies every accessor to the cluster; it
//! stores no remote state. Two handles for the same id are interchangeable,
//! and a handle stays valid for as long as the cluster knows the job.

use serde_json::{json, Value};

use crate::client::Client;
use crate::error::Error;
use crate::poll::{self, WaitOptions};
use crate::request::RequestOptions;
use crate::types::{ExecutionInfo, JobStatus, NodeState, QueryMap, WorkerInfo};

/// Worker-rescale actions accepted by `POST /jobs/{id}/_workers`.
const WORKER_ACTIONS: [&str; 3] = ["add", "remove", "total"];

/// Stateless proxy for one job on the cluster.
///
/// Obtained from [`crate::jobs::Jobs::submit`] (server-assigned id) or
/// [`crate::jobs::Jobs::wrap`] (caller-supplied id, not validated remotely).
/// Every accessor is a fresh remote call.
#[derive(Clone)]
pub struct JobHandle {
    client: Client,
    job_id: String,
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("job_id", &self.job_id)
            .finish_non_exhaustive()
    }
}

impl JobHandle {
    /// Wraps a job id. Fails with [`Error::Validation`] on an empty id.
    pub(crate) fn new(client: Client, job_id: impl Into<String>) -> Result<Self, Error> {
        let job_id = job_id.into();
        if job_id.is_empty() {
            return Err(Error::validation("job id must not be empty"));
        }
        Ok(Self { client, job_id })
    }

    /// The immutable job id this handle wraps.
    pub fn id(&self) -> &str {
        &self.job_id
    }

    /// `GET /jobs/{id}`: the job specification as submitted.
    pub async fn spec(&self) -> Result<Value, Error> {
        let path = format!("/jobs/{}", self.job_id);
        Ok(self.client.get(&path, ()).await?.into_value())
    }

    /// `GET /jobs/{id}/slicer`: slicer statistics for the current execution.
    pub async fn slicer(&self) -> Result<Value, Error> {
        let path = format!("/jobs/{}/slicer", self.job_id);
        Ok(self.client.get(&path, ()).await?.into_value())
    }

    /// `GET /jobs/{id}/errors`: accumulated execution errors.
    pub async fn errors(&self) -> Result<Value, Error> {
        let path = format!("/jobs/{}/errors", self.job_id);
        Ok(self.client.get(&path, ()).await?.into_value())
    }

    /// `POST /jobs/{id}/_start`.
    pub async fn start(&self, query: Option<QueryMap>) -> Result<Value, Error> {
        self.job_action("_start", query).await
    }

    /// `POST /jobs/{id}/_stop`.
    pub async fn stop(&self, query: Option<QueryMap>) -> Result<Value, Error> {
        self.job_action("_stop", query).await
    }

    /// `POST /jobs/{id}/_pause`.
    pub async fn pause(&self, query: Option<QueryMap>) -> Result<Value, Error> {
        self.job_action("_pause", query).await
    }

    /// `POST /jobs/{id}/_resume`.
    pub async fn resume(&self, query: Option<QueryMap>) -> Result<Value, Error> {
        self.job_action("_resume", query).await
    }

    /// `POST /ex/{exId}/_recover`: recover the job's current execution.
    ///
    /// Two-step: the current execution id is resolved first, then the
    /// recover action is posted against it.
    pub async fn recover(&self, query: Option<QueryMap>) -> Result<Value, Error> {
        let ex_id = self.ex().await?;
        let path = format!("/ex/{ex_id}/_recover");
        let options = action_options(query);
        Ok(self.client.post(&path, options).await?.into_value())
    }

    /// The id of the job's current execution, from `GET /jobs/{id}/ex`.
    pub async fn ex(&self) -> Result<String, Error> {
        let info = self.ex_info().await?;
        info.ex_id.ok_or_else(|| {
            Error::unexpected(format!(
                "no execution id in response for job {}",
                self.job_id
            ))
        })
    }

    /// The lifecycle status of the job's current execution.
    pub async fn status(&self) -> Result<JobStatus, Error> {
        let info = self.ex_info().await?;
        info.status.ok_or_else(|| {
            Error::unexpected(format!("no status in response for job {}", self.job_id))
        })
    }

    /// Polls [`JobHandle::status`] until `target` (or a terminal status) is
    /// reached.
    ///
    /// Reaching `target` always succeeds. A `completed` job resolves
    /// successfully even when a different target was requested, because no
    /// further transition can happen; the fatal terminal statuses (`failed`,
    /// `rejected`, `aborted`) fail with [`Error::TerminalStatus`]. An
    /// optional wall-clock budget in [`WaitOptions`] bounds the wait.
    pub async fn wait_for_status(
        &self,
        target: JobStatus,
        options: WaitOptions,
    ) -> Result<JobStatus, Error> {
        poll::wait_for_status(self, target, options).await
    }

    /// `POST /jobs/{id}/_workers?<action>=<count>`: rescale the job's workers.
    ///
    /// `action` must be one of `add`, `remove`, or `total`; anything else is
    /// rejected locally before any request is made.
    pub async fn change_workers(&self, action: &str, count: u32) -> Result<Value, Error> {
        if action.is_empty() {
            return Err(Error::validation("change_workers requires an action"));
        }
        if !WORKER_ACTIONS.contains(&action) {
            return Err(Error::validation(format!(
                "invalid worker action \"{action}\", must be one of {WORKER_ACTIONS:?}"
            )));
        }
        let path = format!("/jobs/{}/_workers", self.job_id);
        let qs = QueryMap::from([(action.to_string(), count.to_string())]);
        let options = RequestOptions::query(qs);
        Ok(self.client.post(&path, options).await?.into_value())
    }

    /// The worker processes currently assigned to this job.
    ///
    /// Fetches the full `GET /cluster/state` topology and keeps every active
    /// process whose `assignment` is `"worker"` and whose `job_id` matches,
    /// annotated with the owning node's id. Result order follows the
    /// cluster-state node order, then the in-node active-process order.
    pub async fn workers(&self) -> Result<Vec<WorkerInfo>, Error> {
        self.filter_processes("worker").await
    }

    async fn filter_processes(&self, role: &str) -> Result<Vec<WorkerInfo>, Error> {
        let state = self.client.get("/cluster/state", ()).await?.into_value();
        let nodes = match state {
            Value::Object(map) => map,
            other => {
                return Err(Error::unexpected(format!(
                    "cluster state is not an object: {other}"
                )));
            }
        };

        let mut matched = Vec::new();
        for (_, node) in nodes {
            let node: NodeState = serde_json::from_value(node)
                .map_err(|e| Error::unexpected(format!("malformed cluster state entry: {e}")))?;
            for process in node.active {
                if process.assignment.as_deref() == Some(role)
                    && process.job_id.as_deref() == Some(self.job_id.as_str())
                {
                    matched.push(WorkerInfo {
                        node_id: node.node_id.clone(),
                        process,
                    });
                }
            }
        }
        Ok(matched)
    }

    async fn job_action(&self, action: &str, query: Option<QueryMap>) -> Result<Value, Error> {
        let path = format!("/jobs/{}/{action}", self.job_id);
        let options = action_options(query);
        Ok(self.client.post(&path, options).await?.into_value())
    }

    async fn ex_info(&self) -> Result<ExecutionInfo, Error> {
        let path = format!("/jobs/{}/ex", self.job_id);
        let value = self.client.get(&path, ()).await?.into_value();
        serde_json::from_value(value).map_err(|e| {
            Error::unexpected(format!(
                "malformed execution response for job {}: {e}",
                self.job_id
            ))
        })
    }
}

/// Options for a lifecycle action: caller parameters as the query string and
/// an empty JSON object as the body.
fn action_options(query: Option<QueryMap>) -> RequestOptions {
    RequestOptions {
        qs: query,
        ..RequestOptions::json_body(json!({}))
    }
}
