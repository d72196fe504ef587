//! # Batch Module
//!
//! Capture of independent API calls into one multipart batch request and
//! demultiplexing of the server's answer back into per-call results.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Batch`] | Ordered, keyed parts plus the capture toggle and `process` |
//! | [`BatchPart`] | One captured sub-request and its eventual response |
//! | [`BatchOptions`] | `sanitize` default and whether capture starts immediately |
//! | [`ProcessOutcome`] | Batch processed, or the raw failed batch response |
//! | [`ProcessedResponse`] | A part's response decoded by its kind |
//!
//! ## Example
//!
//! ```rust,no_run
//! use arango_batch::batch::{Batch, BatchOptions};
//! use arango_batch::connection::{Connection, ConnectionOptions};
//! use std::sync::Arc;
//!
//! # async fn run() -> arango_batch::Result<()> {
//! let conn = Arc::new(Connection::new(ConnectionOptions::new("http://127.0.0.1:8529"))?);
//! let batch = Batch::new(conn.clone(), BatchOptions::default());
//!
//! // Captured, answered with a placeholder.
//! conn.get("/_api/document/users/1").await?;
//! batch.next_part_id("new-user");
//! conn.post_json("/_api/document/users", &serde_json::json!({"name": "ada"})).await?;
//!
//! if batch.process().await?.is_processed() {
//!     let created = batch.processed_part_response("new-user")?;
//!     println!("{:?}", created);
//! }
//! # Ok(())
//! # }
//! ```

mod core;
mod decode;
mod part;

pub use self::core::{Batch, BatchHandle, BatchId, BatchOptions, ProcessOutcome};
pub use decode::{decode, CursorPage, ProcessedResponse};
pub use part::{classify_kind, placeholder_response, BatchPart, PLACEHOLDER_BODY};
