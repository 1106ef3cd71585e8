//! Raw HTTP requests submitted through the engine and the transactions it
//! records for them.

use crate::error::{EngineError, Result};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A hand-composed HTTP request replayed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl RawRequest {
    /// Create a request with no headers and an empty body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body and the matching `Content-Type`.
    pub fn json_body<T: Serialize>(self, body: &T) -> Result<Self> {
        let body = serde_json::to_string(body)?;
        let mut request = self.header("Content-Type", "application/json");
        request.body = body;
        Ok(request)
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Origin (`scheme://authority`) of the request URL.
    pub fn origin(&self) -> Result<String> {
        let url = self.parsed_url()?;
        Ok(format!("{}://{}", url.scheme(), authority(&url)?))
    }

    /// Render the request as it goes over the wire.
    ///
    /// The request line carries the absolute URL; `Host` is derived from it
    /// and `Content-Length` is added whenever there is a body.
    pub fn to_wire(&self) -> Result<String> {
        let url = self.parsed_url()?;
        let mut wire = format!(
            "{} {} HTTP/1.1\r\nHost: {}\r\n",
            self.method,
            self.url,
            authority(&url)?
        );

        for (name, value) in &self.headers {
            wire.push_str(&format!("{name}: {value}\r\n"));
        }
        if !self.body.is_empty() {
            wire.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        }
        wire.push_str("\r\n");
        wire.push_str(&self.body);

        Ok(wire)
    }

    fn parsed_url(&self) -> Result<Url> {
        Url::parse(&self.url)
            .map_err(|e| EngineError::InvalidRequest(format!("invalid URL '{}': {e}", self.url)))
    }
}

fn authority(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| EngineError::InvalidRequest(format!("URL '{url}' has no host")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// A request/response transaction recorded by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpMessage {
    /// Engine-side history id
    pub id: String,
    /// Raw request header block
    pub request_header: String,
    /// Request body
    pub request_body: String,
    /// Raw response header block, starting with the status line
    pub response_header: String,
    /// Response body
    pub response_body: String,
}

impl HttpMessage {
    /// Numeric status code from the response status line.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response_header
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse().ok())
    }

    /// Response headers keyed by lower-cased name.
    ///
    /// Repeated headers keep the last value.
    #[must_use]
    pub fn response_headers(&self) -> BTreeMap<String, String> {
        self.response_header
            .lines()
            .skip(1)
            .filter_map(|line| {
                let (name, value) = line.split_once(':')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_ascii_lowercase(), value.trim().to_string()))
            })
            .collect()
    }
}
