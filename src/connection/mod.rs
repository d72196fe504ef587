//! # Connection Module
//!
//! The contract a batch needs from a connection, plus the concrete
//! reqwest-backed [`Connection`].
//!
//! A connection hosts at most one active batch and one capture flag. While
//! the flag is on, requests issued through the connection are appended to
//! the active batch instead of being sent.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchConnection`] | Narrow capability a [`crate::batch::Batch`] depends on |
//! | [`CaptureState`] | Active-batch, capture and batch-request flags |
//! | [`Connection`] | HTTP connection that intercepts requests while capturing |
//! | [`ConnectionOptions`] | Endpoint, database, timeouts and credentials |

mod capture;
mod client;
mod options;

pub use capture::CaptureState;
pub use client::Connection;
pub use options::ConnectionOptions;

use crate::batch::BatchHandle;
use crate::types::HttpResponse;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BatchConnection: Send + Sync {
    fn set_active_batch(&self, batch: Option<BatchHandle>);
    fn active_batch(&self) -> Option<BatchHandle>;
    fn set_capture_batch(&self, capture: bool);
    fn capture_batch(&self) -> bool;
    /// Frame the next request as a literal batch request
    /// (`multipart/form-data` with the batch boundary) instead of a part.
    fn set_batch_request_mode(&self, enabled: bool);
    async fn post(&self, url: &str, body: String) -> Result<HttpResponse>;
}
