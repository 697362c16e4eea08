//! HTTP transport types for the build / dispatch / resolve pipeline.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! request builder produces a `RequestDescriptor`, a transport turns it into a
//! `RawResponse`, and the resolver consumes that response. Neither the builder
//! nor the resolver touches the network.
//!
//! A `RequestDescriptor` exposes read-only accessors only. Everything a
//! transport puts on the wire (`full_url`, `wire_headers`, `body`) is derived
//! here so the blocking and async transports send the same bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound call, fully resolved against the client configuration.
///
/// Built by `ApiClient::build`. Header names are stored lowercase, so lookups
/// through [`RequestDescriptor::header`] are case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub(crate) method: HttpMethod,
    pub(crate) url: Url,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) cookies: BTreeMap<String, String>,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) json_body: Option<Value>,
    pub(crate) body: Option<Bytes>,
    pub(crate) timeout: Duration,
    pub(crate) follow_redirects: bool,
    pub(crate) verify_tls: bool,
}

impl RequestDescriptor {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Base URL plus rendered path, without the query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    pub fn json_body(&self) -> Option<&Value> {
        self.json_body.as_ref()
    }

    /// Serialized JSON body, exactly as it goes on the wire.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// URL including the encoded query string.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                self.query_params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        url
    }

    /// `name=value` pairs joined for a single `cookie` header.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let joined = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }

    /// Every header a transport must send, cookie header included.
    pub fn wire_headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(cookie) = self.cookie_header() {
            headers.push(("cookie".to_string(), cookie));
        }
        headers
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a transport, or constructed directly in tests, then handed to
/// the resolver once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub content: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, content: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            content: content.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
