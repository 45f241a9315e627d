//! Transport-neutral request representation.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// One inbound request to a mocked endpoint, already read into memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingRequest {
    pub method: String,
    /// Normalized path, always beginning with `/`
    pub path: String,
    pub query: HashMap<String, String>,
    /// Lower-case header names; repeated headers joined with ", "
    pub headers: HashMap<String, String>,
    /// Raw body text
    pub body: String,
}

/// Decomposed request values inspected by conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestView {
    pub header: HashMap<String, String>,
    /// Top-level fields of a JSON object body; empty for anything else
    pub body: Map<String, Value>,
    pub query: HashMap<String, String>,
}

impl IncomingRequest {
    pub fn new(method: impl Into<String>, path: &str) -> Self {
        Self {
            method: method.into(),
            path: normalize_request_path(path),
            ..Default::default()
        }
    }

    pub fn with_query_string(mut self, query: &str) -> Self {
        self.query = parse_query_string(query);
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the condition views. A body that is not a JSON object degrades
    /// to an empty view instead of failing the request.
    pub fn view(&self) -> RequestView {
        let body = match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        RequestView {
            header: self.headers.clone(),
            body,
            query: self.query.clone(),
        }
    }
}

/// Collapse a raw URI path into `/segment/segment`: empty segments are
/// dropped and each segment is percent-decoded.
pub fn normalize_request_path(raw: &str) -> String {
    let segments: Vec<String> = raw
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            urlencoding::decode(s)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .collect();

    format!("/{}", segments.join("/"))
}

/// Parse a URL query string (form-urlencoded). Later duplicates win and a
/// key without `=` maps to an empty value.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|d| d.into_owned())
        .unwrap_or(spaced)
}
