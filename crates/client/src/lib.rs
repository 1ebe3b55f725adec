//! Async client for the GridSlice cluster HTTP control API.
//!
//! GridSlice runs data-processing jobs across a cluster of nodes; this crate
//! submits job specifications, queries cluster/job/execution state, and
//! drives job lifecycle transitions (start/stop/pause/resume/recover/
//! rescale) over the cluster's JSON REST API.
//!
//! The interesting machinery is concentrated in three places; everything
//! else is a thin proxy over them:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`request`] | Call-argument normalization into one canonical request shape |
//! | [`response`] | HTTP status / body-shape mapping into values or typed errors |
//! | [`poll`] | The wait-for-status polling state machine |
//!
//! Entity handles ([`Jobs`], [`Cluster`], [`Assets`], [`JobHandle`]) hold no
//! remote state: every accessor is a fresh call against the cluster, so
//! concurrent use needs no coordination. Nothing in this crate retries,
//! backs off, or logs on the caller's behalf.
//!
//! ## Example
//!
//! ```no_run
//! use gridslice_client::{ClientConfig, GridsliceClient, JobStatus, WaitOptions};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), gridslice_client::Error> {
//! let cluster = GridsliceClient::new(&ClientConfig::with_host("http://localhost:5678"))?;
//!
//! let job = cluster
//!     .jobs()
//!     .submit(&json!({ "name": "reindex", "operations": [] }), true)
//!     .await?;
//!
//! let status = job
//!     .wait_for_status(JobStatus::Running, WaitOptions::default())
//!     .await?;
//! println!("job {} is {status}", job.id());
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod client;
pub mod cluster;
pub mod config;
pub mod error;
pub mod job;
pub mod jobs;
pub mod poll;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

// Re-export the surface most callers need at the crate root.
pub use assets::Assets;
pub use client::{Client, GridsliceClient};
pub use cluster::Cluster;
pub use config::{ClientConfig, DEFAULT_HOST};
pub use error::{Error, ErrorCode};
pub use job::JobHandle;
pub use jobs::{Jobs, ListQuery};
pub use poll::WaitOptions;
pub use request::{Arg, CallArgs, CallData, RequestBody, RequestOptions, RequestSpec};
pub use response::{RawResponse, ResponseValue};
pub use transport::{HttpTransport, Transport};
pub use types::{ActiveProcess, ExecutionInfo, JobStatus, NodeState, QueryMap, WorkerInfo};
