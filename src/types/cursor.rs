use serde::{Deserialize, Serialize};

/// Options applied when a part's response is decoded into documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorOptions {
    /// Strip the server-internal `_id` and `_rev` attributes from returned documents.
    #[serde(default)]
    pub sanitize: bool,
}

impl CursorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }
}
