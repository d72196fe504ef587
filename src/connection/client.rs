use super::{BatchConnection, CaptureState, ConnectionOptions};
use crate::batch::BatchHandle;
use crate::transport::HttpTransport;
use crate::types::HttpResponse;
use crate::wire::{batch_content_type, build_raw_request};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// HTTP connection to one server endpoint.
///
/// Every request made through it honours the capture flag: while a batch
/// captures, the request is serialized and appended to the active batch, and
/// the batch's placeholder response is returned instead of a server answer.
pub struct Connection {
    options: ConnectionOptions,
    host: String,
    transport: HttpTransport,
    capture: CaptureState,
}

impl Connection {
    pub fn new(options: ConnectionOptions) -> Result<Self> {
        let transport = HttpTransport::new(&options)?;
        let host = options.host_header()?;
        Ok(Self {
            options,
            host,
            transport,
            capture: CaptureState::new(),
        })
    }

    /// Shared connection built from `ARANGO_*` environment variables.
    pub fn from_env() -> Result<Arc<Self>> {
        Ok(Arc::new(Self::new(ConnectionOptions::from_env())?))
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.send("GET", path, String::new()).await
    }

    pub async fn delete(&self, path: &str) -> Result<HttpResponse> {
        self.send("DELETE", path, String::new()).await
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        self.send("POST", path, serde_json::to_string(body)?).await
    }

    pub async fn put_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        self.send("PUT", path, serde_json::to_string(body)?).await
    }

    pub async fn patch_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        self.send("PATCH", path, serde_json::to_string(body)?).await
    }

    /// Issue a request, or capture it into the active batch.
    pub async fn send(&self, method: &str, path: &str, body: String) -> Result<HttpResponse> {
        let method = method.to_uppercase();
        let path = self.options.database_path(path);

        if self.capture.is_capturing() {
            let raw = build_raw_request(&method, &path, &self.host, &[], &body, true);
            let batch = self.capture.active_batch().ok_or(Error::NotActive)?;
            debug!(
                batch_id = %batch.id(),
                method = method.as_str(),
                path = path.as_str(),
                "request captured into batch"
            );
            return batch.append(&method, &raw);
        }

        let batch_ct;
        let content_type = if self.capture.batch_request_mode() {
            batch_ct = batch_content_type();
            Some(batch_ct.as_str())
        } else if !body.is_empty() {
            Some("application/json")
        } else {
            None
        };
        self.transport
            .execute(&method, &path, content_type, body)
            .await
    }
}

#[async_trait]
impl BatchConnection for Connection {
    fn set_active_batch(&self, batch: Option<BatchHandle>) {
        self.capture.set_active_batch(batch);
    }

    fn active_batch(&self) -> Option<BatchHandle> {
        self.capture.active_batch()
    }

    fn set_capture_batch(&self, capture: bool) {
        self.capture.set_capture(capture);
    }

    fn capture_batch(&self) -> bool {
        self.capture.is_capturing()
    }

    fn set_batch_request_mode(&self, enabled: bool) {
        self.capture.set_batch_request_mode(enabled);
    }

    async fn post(&self, url: &str, body: String) -> Result<HttpResponse> {
        self.send("POST", url, body).await
    }
}
