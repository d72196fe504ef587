//! Send a file of requests to an ArangoDB server as one batch.
//!
//! Each non-empty line that is not a `#` comment reads
//! `[@<content-id>] METHOD PATH [BODY]`, for example:
//!
//! ```text
//! @alice POST /_api/document/users {"name":"alice"}
//! GET /_api/collection/users
//! PUT /_api/simple/all {"collection":"users"}
//! ```
//!
//! Connection settings come from `ARANGO_*` environment variables, or from a
//! YAML file given as the second argument.

use anyhow::{bail, Context};
use arango_batch::{Batch, BatchOptions, Connection, ConnectionOptions, ProcessOutcome};
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct RequestLine {
    id: Option<String>,
    method: String,
    path: String,
    body: String,
}

fn parse_line(line: &str) -> Option<RequestLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut rest = line;
    let mut id = None;
    if let Some(stripped) = rest.strip_prefix('@') {
        let (tag, tail) = stripped.split_once(char::is_whitespace)?;
        id = Some(tag.to_string());
        rest = tail.trim_start();
    }
    let (method, tail) = rest.split_once(char::is_whitespace)?;
    let tail = tail.trim_start();
    let (path, body) = match tail.split_once(char::is_whitespace) {
        Some((path, body)) => (path, body.trim()),
        None => (tail, ""),
    };
    Some(RequestLine {
        id,
        method: method.to_uppercase(),
        path: path.to_string(),
        body: body.to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(requests_path) = args.next() else {
        bail!("usage: arango-batch <requests-file> [connection.yaml]");
    };
    let options = match args.next() {
        Some(path) => ConnectionOptions::from_yaml_file(&path)
            .with_context(|| format!("loading connection options from {}", path))?
            .with_env_overrides(),
        None => ConnectionOptions::from_env(),
    };

    let content = std::fs::read_to_string(&requests_path)
        .with_context(|| format!("reading {}", requests_path))?;
    let requests: Vec<RequestLine> = content.lines().filter_map(parse_line).collect();

    let conn = Arc::new(Connection::new(options)?);
    let batch = Batch::new(conn.clone(), BatchOptions::default());
    for req in &requests {
        if let Some(id) = &req.id {
            batch.next_part_id(id.as_str());
        }
        conn.send(&req.method, &req.path, req.body.clone()).await?;
    }
    println!("Captured {} request(s)", batch.count_parts());

    match batch.process().await? {
        ProcessOutcome::Failed(resp) => {
            bail!("batch request failed: HTTP {} {}", resp.status(), resp.body());
        }
        ProcessOutcome::Processed => {
            for (key, part) in batch.parts() {
                println!("[{}] {} -> HTTP {}", key, part.kind(), part.http_code());
                println!("{}", part.response().body().trim_end());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_variants() {
        assert_eq!(parse_line("  # comment"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(
            parse_line("get /_api/collection/users"),
            Some(RequestLine {
                id: None,
                method: "GET".to_string(),
                path: "/_api/collection/users".to_string(),
                body: String::new(),
            })
        );
        assert_eq!(
            parse_line(r#"@a1 POST /_api/document/users {"name": "a"}"#),
            Some(RequestLine {
                id: Some("a1".to_string()),
                method: "POST".to_string(),
                path: "/_api/document/users".to_string(),
                body: r#"{"name": "a"}"#.to_string(),
            })
        );
        assert_eq!(parse_line("@lonely"), None);
    }
}
