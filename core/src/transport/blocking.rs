use std::io;
use std::time::Duration;

use bytes::Bytes;
use ureq::http::Response;
use ureq::tls::TlsConfig;
use ureq::{Agent, Body, RequestBuilder};

use super::BlockingTransport;
use crate::error::ClientError;
use crate::http::{HttpMethod, RawResponse, RequestDescriptor};

const MAX_REDIRECTS: u32 = 10;

/// Blocking transport on top of `ureq`.
///
/// Without an injected agent, every request gets a fresh agent with the
/// descriptor's TLS setting. An injected agent is reused across calls and
/// keeps its own TLS setup. In both cases timeout, redirects and status
/// handling are applied per request from the descriptor.
#[derive(Clone, Default)]
pub struct UreqTransport {
    agent: Option<Agent>,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self { agent: None }
    }

    /// Reuse a caller-owned agent for connection pooling.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent: Some(agent) }
    }

    fn agent_for(&self, request: &RequestDescriptor) -> Agent {
        if let Some(agent) = &self.agent {
            return agent.clone();
        }
        Agent::config_builder()
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(!request.verify_tls())
                    .build(),
            )
            .build()
            .new_agent()
    }
}

impl BlockingTransport for UreqTransport {
    fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, ClientError> {
        let agent = self.agent_for(request);
        let url = request.full_url();
        let headers = request.wire_headers();

        let result = match request.method() {
            HttpMethod::Get => prepare(agent.get(url.as_str()), request, &headers).call(),
            HttpMethod::Delete => prepare(agent.delete(url.as_str()), request, &headers).call(),
            HttpMethod::Post => send_body(prepare(agent.post(url.as_str()), request, &headers), request.body()),
            HttpMethod::Patch => send_body(prepare(agent.patch(url.as_str()), request, &headers), request.body()),
        };

        let mut response: Response<Body> = result.map_err(|err| fault(err, request.timeout()))?;
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
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|err| fault(err, request.timeout()))?;

        Ok(RawResponse {
            status,
            headers,
            content: Bytes::from(content),
        })
    }
}

/// Request-scoped settings override whatever the agent was built with.
fn prepare<B>(
    builder: RequestBuilder<B>,
    request: &RequestDescriptor,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    let max_redirects = if request.follow_redirects() {
        MAX_REDIRECTS
    } else {
        0
    };
    let mut builder = builder
        .config()
        .http_status_as_error(false)
        .timeout_global(Some(request.timeout()))
        .max_redirects(max_redirects)
        .max_redirects_will_error(false)
        .build();
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&Bytes>,
) -> Result<Response<Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(&bytes[..]),
        None => builder.send_empty(),
    }
}

fn fault(err: ureq::Error, timeout: Duration) -> ClientError {
    match err {
        ureq::Error::Timeout(_) => ClientError::Timeout { timeout },
        ureq::Error::Io(io_err)
            if matches!(io_err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) =>
        {
            ClientError::Timeout { timeout }
        }
        other => ClientError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_timeouts_map_to_timeout_fault() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        let fault = fault(err, Duration::from_millis(10));
        assert!(matches!(fault, ClientError::Timeout { timeout } if timeout == Duration::from_millis(10)));
    }

    #[test]
    fn other_io_errors_map_to_transport_fault() {
        let err = ureq::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(fault(err, Duration::from_secs(1)), ClientError::Transport(_)));
    }
}
