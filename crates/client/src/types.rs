//! Shared value types for the GridSlice control API.
//!
//! These are the small typed projections this client makes from otherwise
//! schemaless JSON responses: job lifecycle statuses, execution summaries,
//! and cluster-state process listings. Unknown fields are preserved rather
//! than rejected so the client keeps working across cluster releases.

use serde::{Deserialize, Serialize};

/// Query-string parameters for endpoints that accept free-form options.
pub type QueryMap = std::collections::BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Job lifecycle status
// ---------------------------------------------------------------------------

/// Lifecycle status of a job execution as reported by the cluster.
///
/// The set of known statuses mirrors the cluster's execution state machine.
/// Statuses introduced by newer cluster releases deserialize into
/// [`JobStatus::Other`] instead of failing.
///
/// Terminal statuses (no further transition possible) are `completed`,
/// `failed`, `rejected`, and `aborted`; of those only `completed` is a
/// non-failure outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Accepted but not yet scheduled.
    Pending,
    /// Being placed onto cluster nodes.
    Scheduling,
    /// Workers are starting up.
    Initializing,
    /// Actively processing slices.
    Running,
    /// Workers are erroring; the execution may still recover.
    Failing,
    /// Paused by operator request.
    Paused,
    /// Stopped by operator request.
    Stopped,
    /// Finished successfully. Terminal, non-failure.
    Completed,
    /// Finished unsuccessfully. Terminal, failure.
    Failed,
    /// Refused by the cluster before running. Terminal, failure.
    Rejected,
    /// Killed before completion. Terminal, failure.
    Aborted,
    /// A status string this client release does not know about.
    Other(String),
}

impl JobStatus {
    /// The wire representation of this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Scheduling => "scheduling",
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Failing => "failing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
            Self::Aborted => "aborted",
            Self::Other(s) => s,
        }
    }

    /// `true` if no further status transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Rejected | Self::Aborted
        )
    }

    /// `true` if this is a terminal status that represents a failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Failed | Self::Rejected | Self::Aborted)
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "scheduling" => Self::Scheduling,
            "initializing" => Self::Initializing,
            "running" => Self::Running,
            "failing" => Self::Failing,
            "paused" => Self::Paused,
            "stopped" => Self::Stopped,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "rejected" => Self::Rejected,
            "aborted" => Self::Aborted,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for JobStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Execution summary
// ---------------------------------------------------------------------------

/// Projection of `GET /jobs/{id}/ex`: the current execution id and status.
///
/// Both fields are optional on the wire; accessors on
/// [`crate::job::JobHandle`] turn their absence into contract errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionInfo {
    /// Identifier of the current execution. `exId` is the legacy spelling.
    #[serde(default, alias = "exId")]
    pub ex_id: Option<String>,

    /// Current lifecycle status of the execution.
    #[serde(default, rename = "_status")]
    pub status: Option<JobStatus>,
}

// ---------------------------------------------------------------------------
// Cluster state
// ---------------------------------------------------------------------------

/// One entry in a node's active-process list from `GET /cluster/state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveProcess {
    /// Role of the process, e.g. `"worker"` or `"slicer"`.
    #[serde(default)]
    pub assignment: Option<String>,

    /// Identifier of the job this process belongs to, if any.
    #[serde(default)]
    pub job_id: Option<String>,

    /// Identifier of the execution this process belongs to, if any.
    #[serde(default)]
    pub ex_id: Option<String>,

    /// Fields this client does not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// State of a single cluster node from `GET /cluster/state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    /// Identifier of the node.
    pub node_id: String,

    /// Processes currently running on the node, in cluster-reported order.
    #[serde(default)]
    pub active: Vec<ActiveProcess>,

    /// Fields this client does not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A worker process annotated with the node that hosts it.
///
/// Produced by [`crate::job::JobHandle::workers`]: the cluster reports
/// processes grouped per node, and this type flattens that grouping while
/// keeping the node association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerInfo {
    /// Identifier of the node hosting this worker.
    pub node_id: String,

    /// The worker process entry as reported in the node's active list.
    #[serde(flatten)]
    pub process: ActiveProcess,
}
