//! Job submission and lookup.

use serde_json::Value;

use crate::client::Client;
use crate::error::Error;
use crate::job::JobHandle;
use crate::request::RequestOptions;
use crate::types::{JobStatus, QueryMap};

/// Filter for [`Jobs::list`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListQuery {
    /// Executions in any status (`status=*`).
    #[default]
    All,
    /// Executions in one specific status.
    Status(JobStatus),
    /// A free-form query mapping, passed through unchanged.
    Query(QueryMap),
}

impl From<()> for ListQuery {
    fn from(_: ()) -> Self {
        Self::All
    }
}

impl From<JobStatus> for ListQuery {
    fn from(status: JobStatus) -> Self {
        Self::Status(status)
    }
}

impl From<&str> for ListQuery {
    fn from(status: &str) -> Self {
        Self::Status(JobStatus::from(status))
    }
}

impl From<QueryMap> for ListQuery {
    fn from(query: QueryMap) -> Self {
        Self::Query(query)
    }
}

/// Facade for submitting and enumerating jobs.
///
/// Stateless; holds only the shared transport.
#[derive(Clone)]
pub struct Jobs {
    client: Client,
}

impl Jobs {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// `POST /jobs`: submit a job specification.
    ///
    /// `start` controls the `start` query flag — `false` registers the job
    /// without starting it. Resolves to a [`JobHandle`] wrapping the
    /// server-assigned `job_id` from the 202 response.
    pub async fn submit(&self, job_spec: &Value, start: bool) -> Result<JobHandle, Error> {
        if job_spec.is_null() {
            return Err(Error::validation("submit requires a job spec"));
        }

        let options = RequestOptions::json_body(job_spec.clone()).with_query(QueryMap::from([(
            "start".to_string(),
            start.to_string(),
        )]));
        let result = self.client.post("/jobs", options).await?.into_value();

        let job_id = result
            .get("job_id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::unexpected("no job_id in submission response"))?;
        self.wrap(job_id)
    }

    /// `GET /ex`: list executions.
    ///
    /// With no filter ([`ListQuery::All`]) every status is requested
    /// (`status=*`); a bare status string is the legacy single-status form.
    pub async fn list(&self, query: impl Into<ListQuery>) -> Result<Value, Error> {
        let qs = match query.into() {
            ListQuery::All => QueryMap::from([("status".to_string(), "*".to_string())]),
            ListQuery::Status(status) => {
                QueryMap::from([("status".to_string(), status.as_str().to_string())])
            }
            ListQuery::Query(map) => map,
        };
        let options = RequestOptions::query(qs);
        Ok(self.client.get("/ex", options).await?.into_value())
    }

    /// Wraps a caller-supplied job id in a [`JobHandle`].
    ///
    /// The id is not validated against the cluster; operations on the handle
    /// fail remotely if the job does not exist.
    pub fn wrap(&self, job_id: impl Into<String>) -> Result<JobHandle, Error> {
        JobHandle::new(self.client.clone(), job_id)
    }
}
