//! Decoding of a part's response according to its kind.

use super::part::BatchPart;
use crate::types::{CursorOptions, HttpResponse};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Attributes removed from documents when `sanitize` is on.
const SANITIZED_ATTRIBUTES: [&str; 2] = ["_id", "_rev"];

/// Simple-query kinds whose response carries a cursor-shaped `result` list.
const CURSOR_KINDS: [&str; 7] = ["cursor", "all", "by", "range", "near", "within", "fulltext"];

/// A part's response decoded into the shape its kind implies.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedResponse {
    /// A single document or edge read (`getdocument`, `getedge`).
    Document(Map<String, Value>),
    /// Collection properties (`getcollection`).
    Collection(Map<String, Value>),
    /// Handle of a written document, edge (`_id`) or collection (`id`).
    Handle(String),
    /// First batch of a cursor or simple query.
    Cursor(CursorPage),
    /// A write whose response reported `error: true`, left undecoded.
    Raw(HttpResponse),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage {
    pub id: Option<String>,
    pub result: Vec<Value>,
    pub has_more: bool,
    pub count: Option<u64>,
}

impl BatchPart {
    /// Decode the current response (final, or placeholder before processing)
    /// according to this part's kind and cursor options.
    pub fn processed_response(&self) -> Result<ProcessedResponse> {
        decode(self.kind(), self.response(), self.cursor_options())
    }
}

pub fn decode(kind: &str, response: &HttpResponse, options: CursorOptions) -> Result<ProcessedResponse> {
    match kind {
        "getdocument" | "getedge" => {
            let mut doc = json_object(response)?;
            if options.sanitize {
                sanitize(&mut doc);
            }
            Ok(ProcessedResponse::Document(doc))
        }
        "getcollection" => Ok(ProcessedResponse::Collection(json_object(response)?)),
        "document" | "edge" => handle_or_raw(response, "_id"),
        "collection" => handle_or_raw(response, "id"),
        k if CURSOR_KINDS.contains(&k) => {
            let json = json_object(response)?;
            Ok(ProcessedResponse::Cursor(cursor_page(json, options)))
        }
        other => Err(Error::UnsupportedKind {
            kind: other.to_string(),
        }),
    }
}

fn json_object(response: &HttpResponse) -> Result<Map<String, Value>> {
    match response.json()? {
        Value::Object(map) => Ok(map),
        other => Ok(Map::from_iter([("result".to_string(), other)])),
    }
}

fn handle_or_raw(response: &HttpResponse, attribute: &str) -> Result<ProcessedResponse> {
    let json = json_object(response)?;
    let failed = json.get("error").and_then(Value::as_bool).unwrap_or(false);
    match json.get(attribute) {
        Some(handle) if !failed => Ok(ProcessedResponse::Handle(match handle {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })),
        _ => Ok(ProcessedResponse::Raw(response.clone())),
    }
}

fn cursor_page(mut json: Map<String, Value>, options: CursorOptions) -> CursorPage {
    let mut result = match json.remove("result") {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    };
    if options.sanitize {
        for item in result.iter_mut() {
            if let Value::Object(doc) = item {
                sanitize(doc);
            }
        }
    }
    // The server sends a boolean; the capture placeholder uses 1.
    let has_more = match json.get("hasMore") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_u64().map(|n| n != 0).unwrap_or(false),
        _ => false,
    };
    CursorPage {
        id: json.get("id").and_then(Value::as_str).map(str::to_string),
        result,
        has_more,
        count: json.get("count").and_then(Value::as_u64),
    }
}

fn sanitize(doc: &mut Map<String, Value>) {
    for attribute in SANITIZED_ATTRIBUTES {
        doc.remove(attribute);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, HeaderMap::new(), body)
    }

    #[test]
    fn test_document_read_sanitized() {
        let resp = ok(r#"{"_id":"users/1","_key":"1","_rev":"abc","name":"ada"}"#);
        let decoded = decode("getdocument", &resp, CursorOptions::new().with_sanitize(true)).unwrap();
        let ProcessedResponse::Document(doc) = decoded else {
            panic!("expected document");
        };
        assert!(doc.get("_id").is_none());
        assert!(doc.get("_rev").is_none());
        assert_eq!(doc["_key"], "1");
        assert_eq!(doc["name"], "ada");
    }

    #[test]
    fn test_document_read_unsanitized_keeps_identity() {
        let resp = ok(r#"{"_id":"users/1","_rev":"abc"}"#);
        let decoded = decode("getedge", &resp, CursorOptions::default()).unwrap();
        assert!(matches!(decoded, ProcessedResponse::Document(ref d) if d["_id"] == "users/1"));
    }

    #[test]
    fn test_writes_yield_handles_or_raw() {
        let created = ok(r#"{"error":false,"_id":"users/9","_rev":"1"}"#);
        assert_eq!(
            decode("document", &created, CursorOptions::default()).unwrap(),
            ProcessedResponse::Handle("users/9".to_string())
        );

        let collection = ok(r#"{"error":false,"id":"12345","name":"users"}"#);
        assert_eq!(
            decode("collection", &collection, CursorOptions::default()).unwrap(),
            ProcessedResponse::Handle("12345".to_string())
        );

        let conflict = HttpResponse::new(409, HeaderMap::new(), r#"{"error":true,"errorNum":1210}"#);
        assert!(matches!(
            decode("edge", &conflict, CursorOptions::default()).unwrap(),
            ProcessedResponse::Raw(ref r) if r.status() == 409
        ));
    }

    #[test]
    fn test_cursor_page_decoding() {
        let resp = ok(r#"{"result":[{"_id":"u/1","a":1},{"_id":"u/2","a":2}],"hasMore":true,"id":"777","count":5}"#);
        let decoded = decode("all", &resp, CursorOptions::new().with_sanitize(true)).unwrap();
        let ProcessedResponse::Cursor(page) = decoded else {
            panic!("expected cursor");
        };
        assert_eq!(page.id.as_deref(), Some("777"));
        assert!(page.has_more);
        assert_eq!(page.count, Some(5));
        assert_eq!(page.result.len(), 2);
        assert!(page.result[0].get("_id").is_none());
    }

    #[test]
    fn test_placeholder_decodes_as_cursor() {
        let resp = super::super::part::placeholder_response();
        let decoded = decode("cursor", &resp, CursorOptions::default()).unwrap();
        let ProcessedResponse::Cursor(page) = decoded else {
            panic!("expected cursor");
        };
        assert!(page.has_more);
        assert_eq!(page.result, vec![serde_json::json!({})]);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = decode("version", &ok("{}"), CursorOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind { ref kind } if kind == "version"));
    }
}
