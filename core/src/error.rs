//! Error types for the API client.
//!
//! # Design
//! Every failure that is not a documented backend response lands here. A
//! documented rejection (bad request, not found, ...) is returned as
//! `ParsedResult::TypedError` instead, so callers branch on two channels:
//! the `Result` for faults and the `ParsedResult` variant for domain outcomes.

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

/// Errors returned while building, dispatching, or resolving a call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The URL template names a placeholder the endpoint did not supply.
    #[error("missing value for path parameter `{name}`")]
    MissingPathParameter { name: String },

    /// The request body could not be turned into JSON.
    #[error("request body could not be serialized")]
    InvalidBody(#[source] serde_json::Error),

    /// Base URL plus rendered path is not a valid URL.
    #[error("invalid request url `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// No response arrived within the configured timeout.
    #[error("request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Connection-level failure: DNS, refused connection, TLS, broken pipe.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a status the endpoint does not document and
    /// the client was configured to treat that as fatal.
    #[error("unexpected status {status}")]
    UnexpectedStatus { status: u16, content: Bytes },

    /// One element of a list payload did not match the element DTO.
    #[error("malformed list element at index {index}")]
    MalformedElement {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The response body did not match the shape of the resolved variant.
    #[error("response body could not be deserialized")]
    Decode(#[source] serde_json::Error),

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// True for faults raised by the transport rather than the protocol.
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, ClientError::Timeout { .. } | ClientError::Transport(_))
    }
}
