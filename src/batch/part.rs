//! Batch part: one captured sub-request and its eventual response.

use crate::types::{CursorOptions, HttpResponse, PartKey};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

static KIND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/_api/simple/(?P<simple>\w*)|/_api/(?P<direct>\w*)")
        .expect("kind pattern is valid")
});

/// Body of the synthetic response handed back at capture time.
pub const PLACEHOLDER_BODY: &str =
    r#"{"error":false,"_id":"0/0","id":"0","_rev":0,"hasMore":1,"result":[{}],"documents":[{}]}"#;

/// Classify a captured request by the API segment of its path.
///
/// `/_api/simple/<name>` yields `<name>`, `/_api/<name>` yields `<name>`, and
/// GET requests to the direct form get a `get` prefix (`getdocument`). Only
/// word characters are taken, so `/_api/simple/by-example` yields `by`.
pub fn classify_kind(method: &str, raw_request: &str) -> String {
    let (simple, direct) = match KIND_PATTERN.captures(raw_request) {
        Some(caps) => (
            caps.name("simple").map(|m| m.as_str()).unwrap_or_default(),
            caps.name("direct").map(|m| m.as_str()).unwrap_or_default(),
        ),
        None => return String::new(),
    };
    let kind = if direct.is_empty() { simple } else { direct };
    if method == "GET" && kind == direct {
        format!("get{}", kind)
    } else {
        kind.to_string()
    }
}

/// The `202 Accepted` response returned to callers while a request is only captured.
pub fn placeholder_response() -> HttpResponse {
    let mut headers = HeaderMap::new();
    let fixed: [(&'static str, &'static str); 5] = [
        ("location", "/_db/_system/_api/document/0/0"),
        ("server", "triagens GmbH High-Performance HTTP Server"),
        ("content-type", "application/json; charset=utf-8"),
        ("etag", "\"0\""),
        ("connection", "Close"),
    ];
    for (name, value) in fixed {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    HttpResponse::new(202, headers, PLACEHOLDER_BODY)
}

#[derive(Debug, Clone)]
pub struct BatchPart {
    id: Option<PartKey>,
    kind: String,
    raw_request: String,
    placeholder: HttpResponse,
    cursor_options: CursorOptions,
    final_response: Option<HttpResponse>,
}

impl BatchPart {
    pub(crate) fn new(
        id: Option<PartKey>,
        kind: String,
        raw_request: String,
        placeholder: HttpResponse,
        cursor_options: CursorOptions,
    ) -> Self {
        Self {
            id,
            kind,
            raw_request,
            placeholder,
            cursor_options,
            final_response: None,
        }
    }

    /// Explicit id, `None` for positional parts.
    pub fn id(&self) -> Option<&PartKey> {
        self.id.as_ref()
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn raw_request(&self) -> &str {
        &self.raw_request
    }

    pub fn cursor_options(&self) -> CursorOptions {
        self.cursor_options
    }

    pub fn placeholder(&self) -> &HttpResponse {
        &self.placeholder
    }

    pub fn final_response(&self) -> Option<&HttpResponse> {
        self.final_response.as_ref()
    }

    /// The final response once processed, else the placeholder.
    pub fn response(&self) -> &HttpResponse {
        self.final_response.as_ref().unwrap_or(&self.placeholder)
    }

    pub fn http_code(&self) -> u16 {
        self.response().status()
    }

    pub(crate) fn set_response(&mut self, response: HttpResponse) {
        self.final_response = Some(response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_direct_and_simple_paths() {
        let cases = [
            ("POST", "POST /_api/document/users HTTP/1.1", "document"),
            ("GET", "GET /_api/document/users/123 HTTP/1.1", "getdocument"),
            ("GET", "GET /_db/app/_api/collection/users HTTP/1.1", "getcollection"),
            ("PUT", "PUT /_api/simple/all HTTP/1.1", "all"),
            ("PUT", "PUT /_api/simple/by-example HTTP/1.1", "by"),
            ("GET", "GET /_API/Simple/any HTTP/1.1", "any"),
            ("POST", "POST /_api/cursor HTTP/1.1", "cursor"),
            ("DELETE", "DELETE /_api/edge/rel/1 HTTP/1.1", "edge"),
        ];
        for (method, raw, expected) in cases {
            assert_eq!(classify_kind(method, raw), expected, "request: {}", raw);
        }
    }

    #[test]
    fn test_classify_edge_cases() {
        // Empty simple name on GET still matches the empty direct group.
        assert_eq!(classify_kind("GET", "GET /_api/simple/ HTTP/1.1"), "get");
        assert_eq!(classify_kind("POST", "POST /version HTTP/1.1"), "");
        assert_eq!(classify_kind("GET", "GET /version HTTP/1.1"), "");
        assert_eq!(classify_kind("get", "get /_api/document/x HTTP/1.1"), "document");
    }

    #[test]
    fn test_placeholder_shape() {
        let resp = placeholder_response();
        assert_eq!(resp.status(), 202);
        assert_eq!(resp.body(), PLACEHOLDER_BODY);
        assert_eq!(resp.header("etag"), Some("\"0\""));
        let json = resp.json().unwrap();
        assert_eq!(json["hasMore"], 1);
        assert_eq!(json["_id"], "0/0");
    }

    #[test]
    fn test_response_falls_back_to_placeholder() {
        let mut part = BatchPart::new(
            None,
            "document".to_string(),
            "POST /_api/document/c HTTP/1.1".to_string(),
            placeholder_response(),
            CursorOptions::default(),
        );
        assert_eq!(part.http_code(), 202);
        assert!(part.final_response().is_none());

        part.set_response(HttpResponse::new(201, HeaderMap::new(), "{}"));
        assert_eq!(part.http_code(), 201);
        assert_eq!(part.placeholder().status(), 202);
    }
}
