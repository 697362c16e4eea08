//! Response resolver: `RawResponse` + status table -> `ParsedResult`.
//!
//! # Design
//! Each endpoint declares a closed `StatusTable`: exact status codes mapped to
//! an outcome and the decoder for its payload. One generic `resolve` function
//! consults the table; there is no range fallback, so a status that is not in
//! the table is "unexpected" even if it looks like a success.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::error::ClientError;
use crate::http::RawResponse;

/// Decodes a response body into a payload.
pub type Decoder<T> = fn(&[u8]) -> Result<T, ClientError>;

/// The resolved outcome of one call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResult<T, E> {
    /// A documented success status with its decoded payload.
    Success(T),
    /// A documented error status with its decoded error DTO.
    TypedError(E),
    /// A documented no-content status.
    Unset,
    /// A status the endpoint does not document, with the body untouched.
    Unexpected { status: u16, content: Bytes },
}

impl<T, E> ParsedResult<T, E> {
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedResult::Success(_) => "success",
            ParsedResult::TypedError(_) => "typed_error",
            ParsedResult::Unset => "unset",
            ParsedResult::Unexpected { .. } => "unexpected",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ParsedResult::Success(_))
    }

    /// The success payload, if any.
    pub fn success(self) -> Option<T> {
        match self {
            ParsedResult::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The typed error payload, if any.
    pub fn typed_error(self) -> Option<E> {
        match self {
            ParsedResult::TypedError(error) => Some(error),
            _ => None,
        }
    }
}

/// What a documented status resolves to.
pub enum Outcome<T, E> {
    Success(Decoder<T>),
    TypedError(Decoder<E>),
    NoContent,
}

impl<T, E> Outcome<T, E> {
    fn kind(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::TypedError(_) => "typed_error",
            Outcome::NoContent => "unset",
        }
    }
}

impl<T, E> fmt::Debug for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Closed mapping from exact status code to outcome.
pub struct StatusTable<T, E> {
    entries: BTreeMap<u16, Outcome<T, E>>,
}

impl<T, E> StatusTable<T, E> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn success(mut self, status: u16, decode: Decoder<T>) -> Self {
        self.entries.insert(status, Outcome::Success(decode));
        self
    }

    pub fn typed_error(mut self, status: u16, decode: Decoder<E>) -> Self {
        self.entries.insert(status, Outcome::TypedError(decode));
        self
    }

    pub fn no_content(mut self, status: u16) -> Self {
        self.entries.insert(status, Outcome::NoContent);
        self
    }

    pub fn get(&self, status: u16) -> Option<&Outcome<T, E>> {
        self.entries.get(&status)
    }

    /// Documented status codes in ascending order.
    pub fn statuses(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.keys().copied()
    }
}

impl<T, E> Default for StatusTable<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for StatusTable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

pub fn resolve<T, E>(
    table: &StatusTable<T, E>,
    response: &RawResponse,
    raise_on_unexpected_status: bool,
) -> Result<ParsedResult<T, E>, ClientError> {
    let resolved = match table.get(response.status) {
        Some(Outcome::Success(decode)) => ParsedResult::Success(decode(&response.content[..])?),
        Some(Outcome::TypedError(decode)) => ParsedResult::TypedError(decode(&response.content[..])?),
        Some(Outcome::NoContent) => ParsedResult::Unset,
        None if raise_on_unexpected_status => {
            return Err(ClientError::UnexpectedStatus {
                status: response.status,
                content: response.content.clone(),
            });
        }
        None => ParsedResult::Unexpected {
            status: response.status,
            content: response.content.clone(),
        },
    };
    trace!(status = response.status, outcome = resolved.kind(), "resolved response");
    Ok(resolved)
}

/// Decode a single JSON document.
pub fn json<T: DeserializeOwned>(content: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(content).map_err(ClientError::Decode)
}

/// Decode a JSON array element by element, preserving wire order.
pub fn json_list<T: DeserializeOwned>(content: &[u8]) -> Result<Vec<T>, ClientError> {
    let items: Vec<Value> = serde_json::from_slice(content).map_err(ClientError::Decode)?;
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|source| ClientError::MalformedElement { index, source })
        })
        .collect()
}
