//! Vote Smart API client implementation.

use crate::config::{ClientConfig, OutputType};
use crate::error::{Result, VoteSmartError};
use crate::types::{redact_url, CandidateBio, QueryResult};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

/// Method name of the candidate biography call
pub const CANDIDATE_BIO_METHOD: &str = "CandidateBio.getBio";

/// Main Vote Smart API client
///
/// Every [`query`](VoteSmartClient::query) returns its own [`QueryResult`]; the client keeps no
/// per-call state and can be shared between tasks.
#[derive(Debug, Clone)]
pub struct VoteSmartClient {
    /// HTTP client
    http_client: Client,
    /// Client configuration
    config: ClientConfig,
}

impl VoteSmartClient {
    /// Create a client from a validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        info!(
            "Created Vote Smart client for {} ({} output)",
            config.base_url(),
            config.output_type()
        );
        Ok(Self {
            http_client,
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

    /// Call `method` with `params` and parse the response.
    ///
    /// Pairs are sent in iteration order; pass a slice, a `Vec` or a `BTreeMap` for
    /// reproducible URLs.
    pub async fn query<I, K, V>(&self, method: &str, params: I) -> Result<QueryResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.build_url(method, params)?;
        debug!("Making request to: {}", redact_url(&url));

        let response = self.http_client.get(url.clone()).send().await.map_err(|e| {
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

        let body = response.text().await.map_err(|e| e.without_url())?;
        QueryResult::from_body(self.output_type(), url, body)
    }

    /// Fetch and decode a candidate biography
    pub async fn candidate_bio(&self, candidate_id: &str) -> Result<CandidateBio> {
        if candidate_id.is_empty() {
            return Err(VoteSmartError::invalid_input("Candidate id cannot be empty"));
        }

        let result = self
            .query(CANDIDATE_BIO_METHOD, [("candidateId", candidate_id)])
            .await?;
        decode_bio(&result)
    }
}

/// Build `{base}/{method}?key={token}&o={format}[&name=value]*` with each component escaped
pub(crate) fn build_request_url<I, K, V>(
    config: &ClientConfig,
    method: &str,
    params: I,
) -> Result<Url>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    if method.is_empty() {
        return Err(VoteSmartError::invalid_input("Method cannot be empty"));
    }

    let mut url = config.base_url().clone();
    url.path_segments_mut()
        .map_err(|_| VoteSmartError::invalid_configuration("Base URL cannot carry a path"))?
        .pop_if_empty()
        .push(method);

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("key", config.api_token())
            .append_pair("o", config.output_type().as_str());
        for (name, value) in params {
            query.append_pair(name.as_ref(), value.as_ref());
        }
    }

    Ok(url)
}

pub(crate) fn decode_bio(result: &QueryResult) -> Result<CandidateBio> {
    if let Some(message) = result.error_message() {
        return Err(VoteSmartError::api_error(message));
    }
    result.decode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn client(output_type: OutputType) -> VoteSmartClient {
        VoteSmartClient::new(ClientConfig::new("T1", output_type).unwrap()).unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client(OutputType::Xml);
        let url = client
            .build_url(CANDIDATE_BIO_METHOD, [("candidateId", "9026")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.votesmart.org/CandidateBio.getBio?key=T1&o=XML&candidateId=9026"
        );
    }

    #[test]
    fn test_url_preserves_param_order() {
        let client = client(OutputType::Json);
        let params = vec![("zip", "05401"), ("a", "1"), ("m", "2")];
        let url = client.build_url("Officials.getByZip", params).unwrap();
        assert_eq!(url.query(), Some("key=T1&o=JSON&zip=05401&a=1&m=2"));

        let mut sorted = BTreeMap::new();
        sorted.insert("stateId".to_string(), "VT".to_string());
        sorted.insert("electionYear".to_string(), "2024".to_string());
        let url = client.build_url("Election.getElectionByYearState", &sorted).unwrap();
        assert_eq!(url.query(), Some("key=T1&o=JSON&electionYear=2024&stateId=VT"));
    }

    #[test]
    fn test_url_escaping() {
        let client = client(OutputType::Xml);
        let url = client
            .build_url("Candidates/../getByLastname", [("lastName", "O'Brien & Sons")])
            .unwrap();
        assert_eq!(url.path(), "/Candidates%2F..%2FgetByLastname");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[2], ("lastName".to_string(), "O'Brien & Sons".to_string()));
    }

    #[test]
    fn test_url_with_base_path() {
        let config = ClientConfig::new("T1", OutputType::Xml)
            .unwrap()
            .with_base_url("http://localhost:9000/api/")
            .unwrap();
        let client = VoteSmartClient::new(config).unwrap();
        let no_params: Vec<(&str, &str)> = Vec::new();
        let url = client.build_url("State.getStateIDs", no_params).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/State.getStateIDs?key=T1&o=XML");
    }

    #[test]
    fn test_empty_method_rejected() {
        let err = client(OutputType::Xml)
            .build_url("", [("a", "b")])
            .unwrap_err();
        assert!(matches!(err, VoteSmartError::InvalidInput { .. }));
    }
}
