//! In-memory connection that records batch posts instead of sending them.

#![allow(dead_code)]

use arango_batch::batch::BatchHandle;
use arango_batch::connection::{BatchConnection, CaptureState};
use arango_batch::transport::TransportError;
use arango_batch::{Error, HttpResponse, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub url: String,
    pub body: String,
    pub batch_request_mode: bool,
}

pub struct SpyConnection {
    capture: CaptureState,
    reply_status: u16,
    reply_body: String,
    fail_transport: bool,
    posts: Mutex<Vec<RecordedPost>>,
}

impl SpyConnection {
    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        Self {
            capture: CaptureState::new(),
            reply_status: status,
            reply_body: body.into(),
            fail_transport: false,
            posts: Mutex::new(Vec::new()),
        }
    }

    /// Records posts but fails each one at the transport layer.
    pub fn unreachable() -> Self {
        Self {
            fail_transport: true,
            ..Self::replying(0, "")
        }
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn batch_request_mode(&self) -> bool {
        self.capture.batch_request_mode()
    }
}

#[async_trait]
impl BatchConnection for SpyConnection {
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
        self.posts.lock().unwrap().push(RecordedPost {
            url: url.to_string(),
            body,
            batch_request_mode: self.capture.batch_request_mode(),
        });
        if self.fail_transport {
            return Err(Error::Transport(TransportError::Other(
                "connection refused".to_string(),
            )));
        }
        Ok(HttpResponse::new(
            self.reply_status,
            HeaderMap::new(),
            self.reply_body.clone(),
        ))
    }
}

/// One fragment of a server batch response wrapping `status_line` and `body`.
pub fn fragment(content_id: Option<&str>, status_line: &str, body: &str) -> String {
    let mut s = String::from("--XXXsubpartXXX\r\nContent-Type: application/x-arango-batchpart\r\n");
    if let Some(id) = content_id {
        s.push_str(&format!("Content-Id: {}\r\n", id));
    }
    s.push_str("\r\n");
    s.push_str(status_line);
    s.push_str("\r\ncontent-type: application/json; charset=utf-8\r\n\r\n");
    s.push_str(body);
    s.push_str("\r\n");
    s
}

pub fn batch_response(fragments: &[String]) -> String {
    let mut body = fragments.concat();
    body.push_str("--XXXsubpartXXX--");
    body
}
