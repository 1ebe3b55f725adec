//! Cluster-wide state and reports.

use serde_json::Value;

use crate::client::Client;
use crate::error::Error;
use crate::request::RequestOptions;

/// Report types accepted by `GET /txt/{type}`.
const TXT_TYPES: [&str; 5] = ["slicers", "ex", "jobs", "nodes", "workers"];

/// Facade for cluster-level queries. Stateless.
#[derive(Clone)]
pub struct Cluster {
    client: Client,
}

impl Cluster {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET /cluster/state`: the full node and process topology.
    pub async fn state(&self) -> Result<Value, Error> {
        Ok(self.client.get("/cluster/state", ()).await?.into_value())
    }

    /// `GET /cluster/stats`: aggregate slice metrics.
    pub async fn stats(&self) -> Result<Value, Error> {
        Ok(self.client.get("/cluster/stats", ()).await?.into_value())
    }

    /// `GET /cluster/slicers`: a summary of every active slicer.
    pub async fn slicers(&self) -> Result<Value, Error> {
        Ok(self.client.get("/cluster/slicers", ()).await?.into_value())
    }

    /// `GET /txt/{type}`: a plain-text tabular report.
    ///
    /// `kind` must be one of `slicers`, `ex`, `jobs`, `nodes`, or `workers`;
    /// anything else is rejected locally.
    pub async fn txt(&self, kind: &str) -> Result<String, Error> {
        if !TXT_TYPES.contains(&kind) {
            return Err(Error::validation(format!(
                "\"{kind}\" is not a valid type. Must be one of {TXT_TYPES:?}"
            )));
        }
        let path = format!("/txt/{kind}");
        let options = RequestOptions::default().parse_json(false);
        Ok(self.client.get(&path, options).await?.into_text())
    }
}
