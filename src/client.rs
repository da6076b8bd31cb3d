//! Resource Client seam + blocking HTTP implementation
//!
//! The recorder only needs one operation from its collaborator: create a
//! resource from a JSON record and report whether the remote call succeeded.
//! That contract lives in the [`ResourceClient`] / [`ApiResponse`] traits so
//! tests (and alternative transports) can slot in without touching the
//! recorder. [`MonitoringClient`] is the default implementation: a pooled
//! blocking `reqwest` client that POSTs `<base>/<resource_path>`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use crate::error::{AnnotationError, Result};

/// Outcome of a resource-creation request.
///
/// Status is judged lazily: [`ResourceClient::create`] only fails on
/// transport errors, and `raise_for_status` turns a non-success HTTP status
/// into an error afterwards.
pub trait ApiResponse {
    /// No-op if the remote call succeeded, error otherwise
    fn raise_for_status(&self) -> Result<()>;
}

/// A client able to create resources against the monitoring API
pub trait ResourceClient {
    type Response: ApiResponse;

    /// Perform a creation request for `resource_path` carrying `data`
    fn create(&self, resource_path: &str, data: &serde_json::Value) -> Result<Self::Response>;
}

/// Blocking HTTP client for the monitoring API
#[derive(Debug)]
pub struct MonitoringClient {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl MonitoringClient {
    /// Create a client for the API rooted at `base_url`, authenticating
    /// every request with `auth_token` as a bearer token.
    pub fn new(base_url: &str, auth_token: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;

        let mut token = HeaderValue::from_str(&format!("Bearer {auth_token}")).map_err(|_| {
            AnnotationError::Config("auth token contains invalid header characters".into())
        })?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token);

        let client = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .gzip(true)
            // Keep connections alive for reuse
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, resource_path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AnnotationError::Config("base URL cannot be a base".into()))?
            .pop_if_empty()
            .push(resource_path);
        Ok(url)
    }
}

impl ResourceClient for MonitoringClient {
    type Response = HttpResponse;

    fn create(&self, resource_path: &str, data: &serde_json::Value) -> Result<HttpResponse> {
        let url = self.endpoint(resource_path)?;
        debug!(%url, "submitting {resource_path} record");

        let response = self.client.post(url.clone()).json(data).send()?;
        let status = response.status();
        // Body is read eagerly so a failed status can still show it
        let body = response.text()?;

        info!(status = %status, "response received");
        Ok(HttpResponse { status, url, body })
    }
}

/// Captured HTTP response from a creation request
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    url: Url,
    body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw response body as returned by the API
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Deserialize the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

impl ApiResponse for HttpResponse {
    fn raise_for_status(&self) -> Result<()> {
        if self.status.is_success() {
            Ok(())
        } else {
            Err(AnnotationError::Api {
                status: self.status.as_u16(),
                url: self.url.to_string(),
                body: self.body.clone(),
            })
        }
    }
}
