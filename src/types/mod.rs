//! # Types Module
//!
//! Core value types shared by the batch core, the wire framing and the
//! connection layer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PartKey`] | Positional or caller-assigned key of a batch part |
//! | [`CursorOptions`] | Per-part decoding options (`sanitize`) |
//! | [`HttpResponse`] | Status, headers and body of one HTTP response |

pub mod cursor;
pub mod key;
pub mod response;

pub use cursor::CursorOptions;
pub use key::PartKey;
pub use response::HttpResponse;
