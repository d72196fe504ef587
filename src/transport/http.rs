use crate::connection::ConnectionOptions;
use crate::types::HttpResponse;
use crate::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use std::time::Duration;
use url::Url;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl HttpTransport {
    pub fn new(options: &ConnectionOptions) -> Result<Self> {
        let base_url = options.endpoint_url()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs.max(1)))
            .pool_max_idle_per_host(options.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            username: options.username.clone(),
            password: options.password.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send one request and read the whole response. Non-2xx statuses are
    /// returned as responses, not errors.
    pub async fn execute(
        &self,
        method: &str,
        path: &str,
        content_type: Option<&str>,
        body: String,
    ) -> Result<HttpResponse> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TransportError::Other(format!("invalid request path '{}': {}", path, e)))?;
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let mut req = self.client.request(method, url);
        if let Some(user) = &self.username {
            req = req.basic_auth(user, self.password.as_ref());
        }
        if let Some(ct) = content_type {
            req = req.header(CONTENT_TYPE, ct);
        }
        if !body.is_empty() {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(TransportError::Http)?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let text = resp.text().await.map_err(TransportError::Http)?;
        Ok(HttpResponse::new(status, headers, text))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
