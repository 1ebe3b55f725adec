//! HTTP transport.
//!
//! [`Transport`] is the seam between this crate and the remote cluster API:
//! everything above it works in terms of [`RequestSpec`] in and
//! [`RawResponse`] out. [`HttpTransport`] is the production implementation on
//! `reqwest`; tests substitute a scripted implementation.
//!
//! The transport performs exactly one attempt per call. Retry and backoff are
//! explicitly not provided anywhere in this crate.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Url;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::request::{RequestBody, RequestSpec};
use crate::response::RawResponse;

/// Value of the identifying `User-Agent` header sent with every request.
pub const CLIENT_USER_AGENT: &str = "GridSlice Client";

/// One-shot request execution against the cluster API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes a single request and returns the undecoded response.
    ///
    /// Fails only for transport-level problems; HTTP error statuses are
    /// returned as [`RawResponse`] for the response mapper to classify.
    async fn execute(&self, spec: RequestSpec) -> Result<RawResponse, Error>;
}

/// Production transport backed by a shared `reqwest` client.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Builds a transport for the configured cluster.
    ///
    /// Fails with [`Error::Validation`] when the host is not a valid URL.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let base_url = Url::parse(config.host())
            .map_err(|e| Error::validation(format!("invalid host \"{}\": {e}", config.host())))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::validation(format!("invalid request path \"{path}\": {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, spec: RequestSpec) -> Result<RawResponse, Error> {
        let url = self.url_for(&spec.path)?;
        let mut request = self.http.request(spec.method.clone(), url);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        for (name, value) in &spec.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::validation(format!("invalid header name \"{name}\": {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::validation(format!("invalid header value: {e}")))?;
            request = request.header(name, value);
        }
        match &spec.body {
            Some(RequestBody::Json(value)) => request = request.json(value),
            Some(RequestBody::Raw(bytes)) => request = request.body(bytes.clone()),
            None => {}
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(
            method = %spec.method,
            path = %spec.path,
            status,
            bytes = body.len(),
            "cluster api call"
        );

        Ok(RawResponse { status, body })
    }
}
