//! Credential resolution and client configuration.
//!
//! Configuration is validated once, up front. A [`ClientConfig`] that exists is always usable:
//! the output type is one of [`SUPPORTED_OUTPUT_TYPES`], the token is non-empty and the base URL
//! can carry a method path segment.

use crate::error::{Result, VoteSmartError};
use crate::{DEFAULT_BASE_URL, DEFAULT_ENV_KEY, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Response serialization format requested with the `o` query parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputType {
    #[default]
    #[serde(rename = "XML")]
    Xml,
    #[serde(rename = "JSON")]
    Json,
}

/// Output types the service accepts
pub const SUPPORTED_OUTPUT_TYPES: [OutputType; 2] = [OutputType::Xml, OutputType::Json];

impl OutputType {
    /// Wire name sent as the `o` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputType::Xml => "XML",
            OutputType::Json => "JSON",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = VoteSmartError;

    fn from_str(value: &str) -> Result<Self> {
        validate_output_type(value)
    }
}

/// Validate a textual output type against [`SUPPORTED_OUTPUT_TYPES`].
///
/// Matching is exact: the service only understands the upper-case names.
pub fn validate_output_type(value: &str) -> Result<OutputType> {
    SUPPORTED_OUTPUT_TYPES
        .iter()
        .copied()
        .find(|output_type| output_type.as_str() == value)
        .ok_or_else(|| {
            VoteSmartError::invalid_configuration(format!(
                "The output type '{}' is unsupported",
                value
            ))
        })
}

/// A key-value store that can supply the API token
pub trait CredentialSource {
    /// Look up the value stored under `key`
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads credentials from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Credentials read from a dotenv file without touching the process environment
#[derive(Clone, Default)]
pub struct DotenvCredentials {
    values: HashMap<String, String>,
}

impl DotenvCredentials {
    /// Parse the dotenv file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            values.insert(key, value);
        }
        Ok(Self { values })
    }

    /// Number of entries loaded from the file
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the file had no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for DotenvCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("DotenvCredentials").field("keys", &keys).finish()
    }
}

impl CredentialSource for DotenvCredentials {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl CredentialSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolve the API token stored under `key` in `source`.
///
/// An empty value counts as missing.
pub fn resolve_token<S>(source: &S, key: &str) -> Result<String>
where
    S: CredentialSource + ?Sized,
{
    if key.is_empty() {
        return Err(VoteSmartError::invalid_configuration(
            "The credential key must be a non-empty string",
        ));
    }

    match source.lookup(key) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(VoteSmartError::missing_credential(key)),
    }
}

/// Immutable client configuration
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    output_type: OutputType,
    api_token: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration from an already resolved token
    pub fn new(api_token: impl Into<String>, output_type: OutputType) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(VoteSmartError::invalid_configuration(
                "The API token must not be empty",
            ));
        }

        Ok(Self {
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            output_type,
            api_token,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        })
    }

    /// Resolve the token from `source` under `key`
    pub fn from_source<S>(source: &S, key: &str, output_type: OutputType) -> Result<Self>
    where
        S: CredentialSource + ?Sized,
    {
        let token = resolve_token(source, key)?;
        Self::new(token, output_type)
    }

    /// Resolve the token from the process environment under [`DEFAULT_ENV_KEY`]
    pub fn from_env(output_type: OutputType) -> Result<Self> {
        Self::from_source(&EnvCredentials, DEFAULT_ENV_KEY, output_type)
    }

    /// Point the client at another server
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Override the user agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a request deadline; without one the HTTP client default applies
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Output type requested on every call
    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    /// The API token. Avoid logging it.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// User agent header value
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Optional request deadline
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("output_type", &self.output_type)
            .field("api_token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(VoteSmartError::invalid_configuration(format!(
            "The base URL '{}' cannot carry a method path",
            base_url
        )));
    }
    if url.query().is_some() {
        return Err(VoteSmartError::invalid_configuration(format!(
            "The base URL '{}' must not contain a query string",
            base_url
        )));
    }
    Ok(url)
}
