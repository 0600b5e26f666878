//! HTTP transport used by [`SaferpayClient`](crate::SaferpayClient).
//!
//! The client only needs "GET this path with these query parameters and
//! give me status and body back", so the transport is a small trait that
//! tests and hosts can replace. [`ReqwestTransport`] is the default.

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::error::SaferpayError;

/// A GET request against the gateway, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub path: &'static str,
    pub query: Vec<(String, String)>,
    pub user_agent: String,
}

/// Raw gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    /// Reason phrase from the status line; empty when unavailable.
    pub reason: String,
    pub body: String,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs gateway requests. Implementations must be safe to share across
/// threads; the client holds no other mutable state.
pub trait HttpTransport: Send + Sync {
    fn get(
        &self,
        request: GatewayRequest,
    ) -> impl Future<Output = Result<GatewayResponse, SaferpayError>> + Send;
}

/// `reqwest`-backed transport with a fixed base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: Url) -> Result<Self, SaferpayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| SaferpayError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, base_url })
    }

    /// Use a caller-configured `reqwest::Client`.
    pub fn with_http_client(base_url: Url, http: reqwest::Client) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: GatewayRequest) -> Result<GatewayResponse, SaferpayError> {
        let url = self.url_for(request.path);

        let resp = self
            .http
            .get(&url)
            .query(&request.query)
            .header(reqwest::header::USER_AGENT, &request.user_agent)
            .send()
            .await
            .map_err(|e| SaferpayError::Transport(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SaferpayError::Transport(format!("failed to read response body: {e}")))?;

        Ok(GatewayResponse {
            status: status.as_u16(),
            // The wire reason phrase is not exposed by reqwest.
            reason: String::new(),
            body,
        })
    }
}
