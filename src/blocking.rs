//! Blocking Vote Smart client.
//!
//! Same surface as [`crate::VoteSmartClient`], backed by `reqwest::blocking`. Each `query`
//! blocks the calling thread until the body is received and parsed. Do not use it from inside
//! an async runtime.

use crate::client::{build_request_url, decode_bio, CANDIDATE_BIO_METHOD};
use crate::config::{ClientConfig, OutputType};
use crate::error::{Result, VoteSmartError};
use crate::types::{redact_url, CandidateBio, QueryResult};
use reqwest::blocking::Client;
use tracing::{debug, warn};
use url::Url;

/// Blocking Vote Smart API client
#[derive(Debug, Clone)]
pub struct VoteSmartClient {
    http_client: Client,
    config: ClientConfig,
}

impl VoteSmartClient {
    /// Create a client from a validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            config,
        })
    }

    /// Create a client whose token comes from `VOTESMART_API_KEY`
    pub fn from_env(output_type: OutputType) -> Result<Self> {
        Self::new(ClientConfig::from_env(output_type)?)
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Output type requested on every call
    pub fn output_type(&self) -> OutputType {
        self.config.output_type()
    }

    /// Build the request URL for `method` with `params` in iteration order
    pub fn build_url<I, K, V>(&self, method: &str, params: I) -> Result<Url>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        build_request_url(&self.config, method, params)
    }

    /// Call `method` with `params` and parse the response
    pub fn query<I, K, V>(&self, method: &str, params: I) -> Result<QueryResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.build_url(method, params)?;
        debug!("Making blocking request to: {}", redact_url(&url));

        let response = self.http_client.get(url.clone()).send().map_err(|e| {
            let e = e.without_url();
            warn!("Request to {} failed: {}", redact_url(&url), e);
            VoteSmartError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Request to {} returned {}", redact_url(&url), status);
            return Err(VoteSmartError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| e.without_url())?;
        QueryResult::from_body(self.output_type(), url, body)
    }

    /// Fetch and decode a candidate biography
    pub fn candidate_bio(&self, candidate_id: &str) -> Result<CandidateBio> {
        if candidate_id.is_empty() {
            return Err(VoteSmartError::invalid_input("Candidate id cannot be empty"));
        }

        let result = self.query(CANDIDATE_BIO_METHOD, [("candidateId", candidate_id)])?;
        decode_bio(&result)
    }
}
