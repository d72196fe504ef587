//! HTTP response values, either received from the transport or parsed from
//! raw response text inside a batch fragment.

use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Separator between the header block and the body of an HTTP message.
pub const HEADER_SEPARATOR: &str = "\r\n\r\n";
pub const EOL: &str = "\r\n";

static STATUS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^HTTP/\d\.\d (\d{3})(?: (.*))?$").expect("status line pattern is valid")
});

#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    reason: String,
    headers: HeaderMap,
    body: String,
}

impl HttpResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            reason,
            headers,
            body: body.into(),
        }
    }

    /// Parse a complete HTTP response (status line, headers, body).
    pub fn parse(raw: &str) -> Result<Self> {
        let (head, body) = split_message(raw);
        let mut lines = head.split(EOL);
        let status_line = lines.next().unwrap_or_default().trim_end();
        let caps = STATUS_LINE.captures(status_line).ok_or_else(|| {
            Error::framing_with_context(
                "missing or malformed HTTP status line",
                ErrorContext::new()
                    .with_details(truncate(status_line, 64))
                    .with_source("response_parser"),
            )
        })?;
        let status: u16 = caps[1].parse().map_err(|_| {
            Error::framing_with_context(
                "HTTP status code out of range",
                ErrorContext::new()
                    .with_details(caps[1].to_string())
                    .with_source("response_parser"),
            )
        })?;
        let reason = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        Ok(Self {
            status,
            reason,
            headers: parse_header_lines(lines),
            body: body.to_string(),
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header lookup, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

impl PartialEq for HttpResponse {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.body == other.body && self.headers == other.headers
    }
}

/// Split a message at the first blank line. A message without one is all head.
pub fn split_message(raw: &str) -> (&str, &str) {
    match raw.find(HEADER_SEPARATOR) {
        Some(pos) => (&raw[..pos], &raw[pos + HEADER_SEPARATOR.len()..]),
        None => (raw, ""),
    }
}

/// Collect `name: value` lines into a header map. Lines that are not valid
/// headers (status lines, blanks, garbage) are skipped.
pub fn parse_header_lines<'a>(lines: impl Iterator<Item = &'a str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for line in lines {
        if line.starts_with("HTTP/") {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        match (
            HeaderName::from_bytes(name.trim().as_bytes()),
            HeaderValue::from_str(value.trim()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::debug!(line = line, "skipping unparsable header line"),
        }
    }
    headers
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
