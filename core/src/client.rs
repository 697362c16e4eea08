//! Typed client: build, dispatch, resolve.
//!
//! # Design
//! `ApiClient` holds only an `Arc<ClientConfig>` and carries no mutable state
//! between calls. `build` and `resolve` are pure and shared by both dispatch
//! modes; `call` and `call_async` differ only in which transport trait they
//! await on. A call is terminal in one hop: there are no retries and no
//! resumption.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::builder::build_request;
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::http::{RawResponse, RequestDescriptor};
use crate::resolve::{resolve, ParsedResult};
use crate::transport::{AsyncTransport, BlockingTransport};

/// Resolved outcome plus the raw response it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Detailed<T, E> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub content: Bytes,
    pub parsed: ParsedResult<T, E>,
}

/// Result type of a call against endpoint `E`.
pub type CallResult<E> =
    Result<ParsedResult<<E as Endpoint>::Output, <E as Endpoint>::Error>, ClientError>;

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build<E: Endpoint>(&self, endpoint: &E) -> Result<RequestDescriptor, ClientError> {
        build_request(&self.config, endpoint)
    }

    pub fn resolve<E: Endpoint>(&self, response: &RawResponse) -> CallResult<E> {
        resolve(
            &E::status_table(),
            response,
            self.config.raise_on_unexpected_status(),
        )
    }

    /// Build, dispatch on the calling thread, and resolve.
    pub fn call<E, T>(&self, transport: &T, endpoint: &E) -> CallResult<E>
    where
        E: Endpoint,
        T: BlockingTransport + ?Sized,
    {
        self.call_detailed(transport, endpoint)
            .map(|detailed| detailed.parsed)
    }

    pub fn call_detailed<E, T>(
        &self,
        transport: &T,
        endpoint: &E,
    ) -> Result<Detailed<E::Output, E::Error>, ClientError>
    where
        E: Endpoint,
        T: BlockingTransport + ?Sized,
    {
        let request = self.build(endpoint)?;
        debug!(method = %request.method(), url = %request.url(), "dispatching request");
        let response = transport.send(&request)?;
        debug!(status = response.status, bytes = response.content.len(), "received response");
        self.detailed::<E>(response)
    }

    /// Build, dispatch on the current task, and resolve.
    pub async fn call_async<E, T>(&self, transport: &T, endpoint: &E) -> CallResult<E>
    where
        E: Endpoint,
        T: AsyncTransport + ?Sized,
    {
        self.call_detailed_async(transport, endpoint)
            .await
            .map(|detailed| detailed.parsed)
    }

    pub async fn call_detailed_async<E, T>(
        &self,
        transport: &T,
        endpoint: &E,
    ) -> Result<Detailed<E::Output, E::Error>, ClientError>
    where
        E: Endpoint,
        T: AsyncTransport + ?Sized,
    {
        let request = self.build(endpoint)?;
        debug!(method = %request.method(), url = %request.url(), "dispatching request");
        let response = transport.send(&request).await?;
        debug!(status = response.status, bytes = response.content.len(), "received response");
        self.detailed::<E>(response)
    }

    fn detailed<E: Endpoint>(
        &self,
        response: RawResponse,
    ) -> Result<Detailed<E::Output, E::Error>, ClientError> {
        let parsed = self.resolve::<E>(&response)?;
        Ok(Detailed {
            status: response.status,
            headers: response.headers,
            content: response.content,
            parsed,
        })
    }
}
