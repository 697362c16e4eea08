//! Dispatch: executing a `RequestDescriptor` and returning a `RawResponse`.
//!
//! # Design
//! Blocking and async dispatch differ only in scheduling, never in protocol.
//! Both transports put the same bytes on the wire (`full_url`,
//! `wire_headers`, `body`) and return the body bytes untouched. Neither
//! retries: a timeout or connection failure goes straight back to the caller.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::http::{RawResponse, RequestDescriptor};

mod blocking;
mod nonblocking;

pub use blocking::UreqTransport;
pub use nonblocking::ReqwestTransport;

/// Executes a request on the caller's thread.
pub trait BlockingTransport {
    fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, ClientError>;
}

/// Executes a request on the caller's task; the send is the only await point.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, ClientError>;
}
