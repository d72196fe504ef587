//! # arango-batch
//!
//! Batch request multiplexer for ArangoDB HTTP clients.
//!
//! ## Overview
//!
//! A [`Batch`] puts its connection into capture mode. Every request issued
//! through the connection while capturing is recorded as a batch part and
//! answered immediately with a placeholder. [`Batch::process`] then sends all
//! parts as one `multipart/form-data` request to `/_api/batch`, parses the
//! multipart answer and attaches each sub-response to its part, by
//! `Content-Id` where the server echoes one and by position otherwise.
//!
//! One failing sub-request never affects its siblings: every part carries its
//! own response and is inspected individually.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Batch, parts, processing and response decoding |
//! | [`connection`] | Capture contract and the concrete HTTP connection |
//! | [`wire`] | Raw request text, multipart encoding, two-stage response parsing |
//! | [`transport`] | reqwest-backed HTTP transport |
//! | [`types`] | Part keys, cursor options, HTTP responses |

pub mod batch;
pub mod connection;
pub mod transport;
pub mod types;
pub mod wire;

pub use batch::{Batch, BatchOptions, BatchPart, ProcessOutcome, ProcessedResponse};
pub use connection::{BatchConnection, Connection, ConnectionOptions};
pub use types::{CursorOptions, HttpResponse, PartKey};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
