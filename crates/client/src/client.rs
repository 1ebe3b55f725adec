//! Generic verb client and the top-level facade.
//!
//! [`Client`] is the one place where a call becomes network traffic:
//! normalize the arguments, execute over the transport, map the response.
//! Entity handles ([`crate::jobs::Jobs`], [`crate::cluster::Cluster`],
//! [`crate::assets::Assets`], [`crate::job::JobHandle`]) are thin proxies
//! over it and hold no remote state of their own.

use std::sync::Arc;

use reqwest::Method;

use crate::assets::Assets;
use crate::cluster::Cluster;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::jobs::Jobs;
use crate::request::{normalize, CallArgs};
use crate::response::{map_response, ResponseValue};
use crate::transport::{HttpTransport, Transport};

/// Low-level verb API against the cluster control endpoints.
///
/// Cheap to clone; clones share one transport (and so one connection pool).
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Builds a client for the configured cluster.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(config)?),
        })
    }

    /// Builds a client over an existing transport. Used by tests and by
    /// callers that need a custom adapter.
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET` a path. Bare data becomes the query string.
    pub async fn get(
        &self,
        endpoint: &str,
        args: impl Into<CallArgs>,
    ) -> Result<ResponseValue, Error> {
        self.request(Method::GET, endpoint, args.into()).await
    }

    /// `POST` to a path. Bare mappings/sequences become JSON payloads,
    /// strings and bytes go over verbatim.
    pub async fn post(
        &self,
        endpoint: &str,
        args: impl Into<CallArgs>,
    ) -> Result<ResponseValue, Error> {
        self.request(Method::POST, endpoint, args.into()).await
    }

    /// `PUT` to a path, with the same data handling as [`Client::post`].
    pub async fn put(
        &self,
        endpoint: &str,
        args: impl Into<CallArgs>,
    ) -> Result<ResponseValue, Error> {
        self.request(Method::PUT, endpoint, args.into()).await
    }

    /// `DELETE` a path, with the same data handling as [`Client::post`].
    pub async fn delete(
        &self,
        endpoint: &str,
        args: impl Into<CallArgs>,
    ) -> Result<ResponseValue, Error> {
        self.request(Method::DELETE, endpoint, args.into()).await
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        args: CallArgs,
    ) -> Result<ResponseValue, Error> {
        let spec = normalize(method, endpoint, args)?;
        let parse_json = spec.parse_json;
        let raw = self.transport.execute(spec).await?;
        map_response(raw, parse_json)
    }
}

/// Entry point composing the per-entity facades over one shared transport.
///
/// ```no_run
/// use gridslice_client::{ClientConfig, GridsliceClient};
///
/// # async fn run() -> Result<(), gridslice_client::Error> {
/// let client = GridsliceClient::new(&ClientConfig::with_host("http://cluster:5678"))?;
/// let stats = client.cluster().stats().await?;
/// println!("{stats}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GridsliceClient {
    client: Client,
}

impl std::fmt::Debug for GridsliceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridsliceClient").finish_non_exhaustive()
    }
}

impl GridsliceClient {
    /// Builds the facade set for the configured cluster.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            client: Client::new(config)?,
        })
    }

    /// Builds the facade set over an existing transport.
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: Client::from_transport(transport),
        }
    }

    /// Job submission and lookup.
    pub fn jobs(&self) -> Jobs {
        Jobs::new(self.client.clone())
    }

    /// Cluster-wide state and reports.
    pub fn cluster(&self) -> Cluster {
        Cluster::new(self.client.clone())
    }

    /// Asset bundle management.
    pub fn assets(&self) -> Assets {
        Assets::new(self.client.clone())
    }

    /// The underlying generic verb client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
