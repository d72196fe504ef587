//! Multipart batch body encoding and two-stage response parsing.

use super::{BATCH_PART_CONTENT_TYPE, MIME_BOUNDARY};
use crate::types::response::{parse_header_lines, split_message, EOL};
use crate::types::{HttpResponse, PartKey};
use crate::{Error, ErrorContext, Result};
use reqwest::header::HeaderMap;

/// Encode the parts of a batch, in the given order, into one multipart body.
///
/// Only parts with an explicit id get a `Content-Id` header.
pub fn encode_batch_body<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = (Option<&'a PartKey>, &'a str)>,
{
    let mut data = String::new();
    for (id, raw_request) in parts {
        data.push_str("--");
        data.push_str(MIME_BOUNDARY);
        data.push_str(EOL);
        data.push_str("Content-Type: ");
        data.push_str(BATCH_PART_CONTENT_TYPE);
        data.push_str(EOL);
        match id {
            Some(id) => {
                data.push_str(&format!("Content-Id: {}", id));
                data.push_str(EOL);
                data.push_str(EOL);
            }
            None => data.push_str(EOL),
        }
        data.push_str(raw_request);
        data.push_str(EOL);
    }
    data.push_str("--");
    data.push_str(MIME_BOUNDARY);
    data.push_str("--");
    data.push_str(EOL);
    data.push_str(EOL);
    data
}

/// Strip the outer boundary markers from a batch response body.
///
/// This removes every leading and trailing character that occurs in
/// `--XXXsubpartXXX--`; it is a character-set trim, not a structural strip.
/// A body whose last fragment ends in one of those characters right before
/// the closing marker loses them too.
pub fn trim_boundary(body: &str) -> &str {
    let closing = format!("--{}--", MIME_BOUNDARY);
    body.trim_matches(|c: char| closing.contains(c))
}

/// One fragment of a batch response: its outer headers and the still-wrapped
/// inner HTTP response text.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Position of the fragment in the split, starting at zero.
    pub index: usize,
    /// `Content-Id` if the server sent one, else the position.
    pub key: PartKey,
    pub content_id: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

/// Stage one: split a batch response body into fragments and read their outer headers.
pub fn split_fragments(body: &str) -> Vec<Fragment> {
    let delimiter = format!("--{}{}", MIME_BOUNDARY, EOL);
    trim_boundary(body)
        .split(delimiter.as_str())
        .enumerate()
        .map(|(index, raw)| {
            let (head, inner) = split_message(raw);
            let headers = parse_header_lines(head.split(EOL));
            let content_id = headers
                .get("content-id")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string());
            let key = match content_id.as_deref() {
                Some(id) => PartKey::from_content_id(id),
                None => PartKey::Index(index as i64),
            };
            Fragment {
                index,
                key,
                content_id,
                headers,
                body: inner.to_string(),
            }
        })
        .collect()
}

/// Stage two: parse the inner HTTP response wrapped by a fragment.
pub fn parse_fragment(fragment: &Fragment) -> Result<HttpResponse> {
    HttpResponse::parse(&fragment.body).map_err(|e| match e {
        Error::Framing { message, context } => Error::framing_with_context(
            message,
            ErrorContext {
                field_path: Some(format!("fragment[{}]", fragment.index)),
                ..context
            },
        ),
        other => other,
    })
}

/// Run both stages over a batch response body, keeping fragment order.
pub fn demultiplex(body: &str) -> Result<Vec<(PartKey, HttpResponse)>> {
    split_fragments(body)
        .iter()
        .map(|fragment| Ok((fragment.key.clone(), parse_fragment(fragment)?)))
        .collect()
}
