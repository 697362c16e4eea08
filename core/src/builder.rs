//! Request builder: endpoint arguments + config snapshot -> `RequestDescriptor`.
//!
//! Pure and synchronous. Headers and cookies come from `ClientConfig` only;
//! the builder adds `content-type` when a body is present and the credentials
//! header when one is configured.

use bytes::Bytes;
use url::Url;

use crate::config::ClientConfig;
use crate::dto::MaybeUnset;
use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::http::RequestDescriptor;

pub fn build_request<E: Endpoint>(
    config: &ClientConfig,
    endpoint: &E,
) -> Result<RequestDescriptor, ClientError> {
    let path = render_path(E::PATH, &endpoint.path_params())?;
    let raw_url = format!("{}{}", config.base_url(), path);
    let url = Url::parse(&raw_url).map_err(|source| ClientError::InvalidUrl {
        url: raw_url.clone(),
        source,
    })?;

    let query_params = collect_query(endpoint.query_params());

    let json_body = endpoint.json_body().map_err(ClientError::InvalidBody)?;
    let body = json_body
        .as_ref()
        .map(serde_json::to_vec)
        .transpose()
        .map_err(ClientError::InvalidBody)?
        .map(Bytes::from);

    let mut headers = config.headers().clone();
    if let Some(credentials) = config.credentials() {
        headers.insert(
            credentials.header_name.to_ascii_lowercase(),
            credentials.header_value(),
        );
    }
    if body.is_some() {
        headers.insert("content-type".to_string(), "application/json".to_string());
    }

    Ok(RequestDescriptor {
        method: E::METHOD,
        url,
        headers,
        cookies: config.cookies().clone(),
        query_params,
        json_body,
        body,
        timeout: config.timeout(),
        follow_redirects: config.follow_redirects(),
        verify_tls: config.verify_tls(),
    })
}

/// Substitute every `{name}` placeholder with its percent-encoded value.
///
/// An unmatched `{` is copied through as a literal.
pub fn render_path(template: &str, params: &[(&str, String)]) -> Result<String, ClientError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let name = &rest[open + 1..open + close];
        let value = params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
            .ok_or_else(|| ClientError::MissingPathParameter {
                name: name.to_string(),
            })?;
        rendered.push_str(&rest[..open]);
        rendered.push_str(&urlencoding::encode(value));
        rest = &rest[open + close + 1..];
    }
    rendered.push_str(rest);
    Ok(rendered)
}

fn collect_query(params: Vec<(&'static str, MaybeUnset<String>)>) -> Vec<(String, String)> {
    params
        .into_iter()
        .filter_map(|(key, value)| value.into_option().map(|v| (key.to_string(), v)))
        .collect()
}
