//! HTTP transport used by [`crate::connection::Connection`].

mod http;

pub use http::{HttpTransport, TransportError};
