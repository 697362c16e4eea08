//! Client-wide configuration.
//!
//! # Design
//! `ClientConfig` is built once and then only read. `ApiClient` keeps it behind
//! an `Arc`, so concurrent calls share it without locking. The `with_*`
//! methods consume and return a config; changing credentials mid-session means
//! deriving a new config and a new client.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::ClientError;

const ENV_BASE_URL: &str = "APICLIENT_BASE_URL";
const ENV_TIMEOUT_MS: &str = "APICLIENT_TIMEOUT_MS";
const ENV_VERIFY_TLS: &str = "APICLIENT_VERIFY_TLS";
const ENV_FOLLOW_REDIRECTS: &str = "APICLIENT_FOLLOW_REDIRECTS";
const ENV_RAISE_ON_UNEXPECTED: &str = "APICLIENT_RAISE_ON_UNEXPECTED_STATUS";
const ENV_TOKEN: &str = "APICLIENT_TOKEN";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Token rendered into a request header as `{prefix} {token}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub header_name: String,
    pub prefix: String,
    pub token: String,
}

impl Credentials {
    /// `authorization: Bearer <token>`.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            header_name: "authorization".to_string(),
            prefix: "Bearer".to_string(),
            token: token.into(),
        }
    }

    pub fn header_value(&self) -> String {
        if self.prefix.is_empty() {
            self.token.clone()
        } else {
            format!("{} {}", self.prefix, self.token)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    headers: BTreeMap<String, String>,
    cookies: BTreeMap<String, String>,
    timeout: Duration,
    verify_tls: bool,
    follow_redirects: bool,
    raise_on_unexpected_status: bool,
    credentials: Option<Credentials>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
            follow_redirects: false,
            raise_on_unexpected_status: false,
            credentials: None,
        }
    }

    /// Load from `APICLIENT_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup using the `APICLIENT_*` names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ClientError::Config(format!("{ENV_BASE_URL} is not set")))?;
        let mut config = Self::new(base_url.trim());

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("{ENV_TIMEOUT_MS} must be an integer, got `{raw}`"))
            })?;
            config = config.with_timeout(Duration::from_millis(millis));
        }
        if let Some(raw) = lookup(ENV_VERIFY_TLS) {
            config = config.with_verify_tls(parse_flag(ENV_VERIFY_TLS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_FOLLOW_REDIRECTS) {
            config = config.with_follow_redirects(parse_flag(ENV_FOLLOW_REDIRECTS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_RAISE_ON_UNEXPECTED) {
            config = config.with_raise_on_unexpected_status(parse_flag(ENV_RAISE_ON_UNEXPECTED, &raw)?);
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            config = config.with_credentials(Credentials::bearer(token));
        }
        Ok(config)
    }

    /// Add or replace a default header. Names are matched case-insensitively.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn with_follow_redirects(mut self, follow_redirects: bool) -> Self {
        self.follow_redirects = follow_redirects;
        self
    }

    pub fn with_raise_on_unexpected_status(mut self, raise: bool) -> Self {
        self.raise_on_unexpected_status = raise;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    pub fn raise_on_unexpected_status(&self) -> bool {
        self.raise_on_unexpected_status
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ClientError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ClientError::Config(format!("{key} must be a boolean, got `{raw}`"))),
    }
}
