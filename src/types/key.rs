//! Batch part keys.

use std::fmt;

/// Key of a batch part: a positional sequence number, an integer content id,
/// or a named content id.
///
/// String ids that spell a canonical decimal integer (`"7"`, `"-3"`, but not
/// `"07"` or `"+7"`) normalize to [`PartKey::Index`]. A server echoing
/// `Content-Id: 7` therefore resolves to the same part as a caller id of `7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartKey {
    Index(i64),
    Named(String),
}

impl PartKey {
    /// Build a key from the text of a `Content-Id` header.
    pub fn from_content_id(raw: &str) -> Self {
        Self::from(raw)
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            PartKey::Index(i) => Some(*i),
            PartKey::Named(_) => None,
        }
    }
}

fn canonical_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    // "-0" is not canonical
    if digits == "0" && s.starts_with('-') {
        return None;
    }
    s.parse().ok()
}

impl From<&str> for PartKey {
    fn from(s: &str) -> Self {
        match canonical_integer(s) {
            Some(i) => PartKey::Index(i),
            None => PartKey::Named(s.to_string()),
        }
    }
}

impl From<String> for PartKey {
    fn from(s: String) -> Self {
        match canonical_integer(&s) {
            Some(i) => PartKey::Index(i),
            None => PartKey::Named(s),
        }
    }
}

impl From<i64> for PartKey {
    fn from(i: i64) -> Self {
        PartKey::Index(i)
    }
}

impl From<i32> for PartKey {
    fn from(i: i32) -> Self {
        PartKey::Index(i64::from(i))
    }
}

impl From<usize> for PartKey {
    fn from(i: usize) -> Self {
        PartKey::Index(i as i64)
    }
}

impl fmt::Display for PartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartKey::Index(i) => write!(f, "{}", i),
            PartKey::Named(s) => f.write_str(s),
        }
    }
}
