//! Typed API client core.
//!
//! # Overview
//! A call goes through three steps. The builder turns an endpoint binding
//! plus the client configuration into a `RequestDescriptor`. A transport
//! executes it, blocking (`UreqTransport`) or async (`ReqwestTransport`), and
//! returns a `RawResponse`. The resolver maps the status code through the
//! endpoint's closed `StatusTable` to a `ParsedResult`.
//!
//! # Design
//! - `ApiClient` is stateless apart from an immutable, shared `ClientConfig`.
//! - Documented backend rejections are values (`ParsedResult::TypedError`);
//!   build errors, transport faults and contract violations are `ClientError`.
//! - Endpoint bindings are plain types implementing `Endpoint`, so adding an
//!   operation means declaring data, not writing another parse function.
//! - DTOs keep unknown keys in `additional_properties`.

pub mod builder;
pub mod client;
pub mod config;
pub mod dto;
pub mod endpoint;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod resolve;
pub mod transport;
pub mod types;

pub use client::{ApiClient, CallResult, Detailed};
pub use config::{ClientConfig, Credentials};
pub use dto::{Dto, MaybeUnset};
pub use endpoint::Endpoint;
pub use endpoints::{CreateObject, DeleteObject, GetObject, ListObjects, UpdateObject};
pub use error::ClientError;
pub use http::{HttpMethod, RawResponse, RequestDescriptor};
pub use resolve::{ParsedResult, StatusTable};
pub use transport::{AsyncTransport, BlockingTransport, ReqwestTransport, UreqTransport};
pub use types::{ApiHttpError, CreateObjectBody, ObjectDto, UpdateObjectBody};
