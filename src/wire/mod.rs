//! # Wire Module
//!
//! Text framing for the batch protocol.
//!
//! Outgoing, every captured sub-request is serialized as raw HTTP text
//! ([`request::build_raw_request`]) and all of them are wrapped into one
//! multipart body ([`multipart::encode_batch_body`]).
//!
//! Incoming, the multipart response is parsed in two stages:
//!
//! 1. [`multipart::split_fragments`] splits the body on the boundary and reads
//!    each fragment's outer headers (`Content-Id`).
//! 2. [`multipart::parse_fragment`] parses the fragment body as the complete
//!    inner HTTP response of one sub-request.

pub mod multipart;
pub mod request;

pub use multipart::{demultiplex, encode_batch_body, parse_fragment, split_fragments, Fragment};
pub use request::build_raw_request;

/// Boundary token shared by requests and responses.
pub const MIME_BOUNDARY: &str = "XXXsubpartXXX";

/// Content type of each part inside a batch body.
pub const BATCH_PART_CONTENT_TYPE: &str = "application/x-arango-batchpart";

/// Server endpoint that accepts batch requests.
pub const BATCH_URL: &str = "/_api/batch";

/// `Content-Type` of the outgoing batch request itself.
pub fn batch_content_type() -> String {
    format!("multipart/form-data; boundary={}", MIME_BOUNDARY)
}

pub const HTTP_PROTOCOL: &str = "HTTP/1.1";
