//! Endpoint bindings.
//!
//! An endpoint binding is a Rust type that carries the call arguments for one
//! API operation and knows, at compile time, its method, URL template, and
//! closed status table. Nothing about an endpoint is discovered at runtime.

use serde_json::Value;

use crate::dto::MaybeUnset;
use crate::http::HttpMethod;
use crate::resolve::StatusTable;

pub trait Endpoint {
    /// Payload of the `Success` variant.
    type Output;
    /// Payload of the `TypedError` variant.
    type Error;

    const METHOD: HttpMethod;
    /// Path relative to the base URL, with `{name}` placeholders.
    const PATH: &'static str;

    fn path_params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Query parameters in wire order. `MaybeUnset::Unset` values are dropped.
    fn query_params(&self) -> Vec<(&'static str, MaybeUnset<String>)> {
        Vec::new()
    }

    /// JSON body for write operations.
    fn json_body(&self) -> Result<Option<Value>, serde_json::Error> {
        Ok(None)
    }

    fn status_table() -> StatusTable<Self::Output, Self::Error>;
}
