use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};

use super::AsyncTransport;
use crate::error::ClientError;
use crate::http::{HttpMethod, RawResponse, RequestDescriptor};

const MAX_REDIRECTS: usize = 10;

/// Async transport on top of `reqwest`.
///
/// Without an injected client, each call builds its own `Client` and drops it
/// when the call ends, so no connection outlives the call. Inject a shared
/// client with [`ReqwestTransport::with_client`] to get pooling; the
/// descriptor's timeout still applies per request.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Option<Client>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { client: None }
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    fn client_for(&self, request: &RequestDescriptor) -> Result<Client, ClientError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let redirect = if request.follow_redirects() {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };
        Client::builder()
            .timeout(request.timeout())
            .redirect(redirect)
            .danger_accept_invalid_certs(!request.verify_tls())
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, ClientError> {
        let client = self.client_for(request)?;
        let mut builder = client
            .request(method(request.method()), request.full_url())
            .timeout(request.timeout());
        for (name, value) in request.wire_headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|err| fault(err, request.timeout()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let content = response
            .bytes()
            .await
            .map_err(|err| fault(err, request.timeout()))?;

        Ok(RawResponse {
            status,
            headers,
            content,
        })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn fault(err: reqwest::Error, timeout: Duration) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout { timeout }
    } else {
        ClientError::Transport(err.to_string())
    }
}
