use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Proxy, header};
use std::sync::Arc;

use super::{Connector, HttpResponse, SessionOptions, Transport};
use crate::errors::TransportError;

/// reqwest-backed session
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client carrying the session headers and proxy
    client: Client,
}

impl HttpTransport {
    /// Build a session from the given options
    pub fn new(options: &SessionOptions) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_str(&options.accept_language)
                .map_err(|e| TransportError::Build(format!("invalid Accept-Language: {}", e)))?,
        );
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            header::HeaderValue::from_static("1"),
        );

        if let Some(cookies) = options.cookies.as_deref().filter(|c| !c.trim().is_empty()) {
            let mut value = header::HeaderValue::from_str(cookies)
                .map_err(|e| TransportError::Build(format!("invalid cookie string: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::COOKIE, value);
        }

        let mut builder = Client::builder()
            .user_agent(options.user_agent.as_str())
            .default_headers(headers)
            .timeout(options.timeout);

        if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            debug!("Routing session through proxy {}", proxy);
            builder = builder.proxy(Proxy::all(proxy).map_err(TransportError::from)?);
        }

        let client = builder.build().map_err(TransportError::from)?;
        Ok(Self { client })
    }

    async fn into_response(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(TransportError::from)?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(TransportError::from)?;
        Self::into_response(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(TransportError::from)?;
        Self::into_response(response).await
    }
}

/// Opens a fresh reqwest session for every resolution call
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(&self, options: &SessionOptions) -> Result<Arc<dyn Transport>, TransportError> {
        Ok(Arc::new(HttpTransport::new(options)?))
    }
}
