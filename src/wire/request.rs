//! Raw HTTP request text for captured sub-requests.

use super::HTTP_PROTOCOL;
use crate::types::response::EOL;

/// Serialize one request the way it is embedded in a batch part.
///
/// Batch parts carry no `Content-Type` header; a standalone request with a
/// body is tagged `application/json`.
pub fn build_raw_request(
    method: &str,
    path: &str,
    host: &str,
    custom_headers: &[(String, String)],
    body: &str,
    batch_part: bool,
) -> String {
    let mut request = format!("{} {} {}{}", method, path, HTTP_PROTOCOL, EOL);
    request.push_str(&format!("Host: {}{}", host, EOL));
    if !batch_part && !body.is_empty() {
        request.push_str("Content-Type: application/json");
        request.push_str(EOL);
    }
    for (name, value) in custom_headers {
        request.push_str(&format!("{}: {}{}", name, value, EOL));
    }
    request.push_str(&format!("Content-Length: {}", body.len()));
    request.push_str(EOL);
    request.push_str(EOL);
    request.push_str(body);
    request
}
