/*!
 * HTTP transport seam.
 *
 * The pipeline only needs two verbs against the platform: GET a page and
 * POST a JSON document. They live behind the `Transport` trait so the
 * retry policy and extraction strategies can be driven by a scripted
 * transport in tests:
 * - `http`: reqwest-backed sessions
 * - `mock`: scripted replies keyed by URL fragment
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::TransportError;

/// Minimal view of an HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded response body
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// One HTTP session bound to a fixed set of headers, proxy and cookies
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// Issue a POST request with a JSON body
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError>;
}

/// Settings a session is opened with
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Browser-like user agent
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
    /// Bound on each individual request
    pub timeout: Duration,
    /// Proxy URL routing every request of the session
    pub proxy: Option<String>,
    /// Raw cookie string forwarded as-is
    pub cookies: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            user_agent: crate::app_config::default_user_agent(),
            accept_language: crate::app_config::default_accept_language(),
            timeout: Duration::from_secs(30),
            proxy: None,
            cookies: None,
        }
    }
}

/// Opens sessions; called once per catalog resolution
pub trait Connector: Send + Sync {
    fn connect(&self, options: &SessionOptions) -> Result<Arc<dyn Transport>, TransportError>;
}

pub mod http;
pub mod mock;

pub use self::http::{HttpConnector, HttpTransport};
pub use self::mock::{ScriptedReply, ScriptedTransport};
