//! Error types for the Vote Smart client library.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VoteSmartError>;

/// Error type for configuration and query failures
///
/// Configuration errors are only produced while building a [`ClientConfig`](crate::ClientConfig)
/// or client. Every other variant is returned from a single `query` call and leaves the client
/// usable for the next one.
#[derive(Error, Debug)]
pub enum VoteSmartError {
    /// Output type or credential key rejected while building the configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The credential source has no token under the requested key
    #[error("Vote Smart requires an API authentication token; none found under `{key}`")]
    MissingCredential { key: String },

    /// Network or HTTP-related errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16 },

    /// The service answered with an empty body
    #[error("Empty response body received")]
    EmptyResponse,

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParsing(#[from] url::ParseError),

    /// Low-level XML syntax errors
    #[error("XML parsing error: {0}")]
    XmlParsing(#[from] quick_xml::Error),

    /// XML was well-formed but did not fit the requested record type
    #[error("XML decoding error: {0}")]
    XmlDecoding(#[from] quick_xml::DeError),

    /// JSON syntax or decoding errors
    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    /// Body parsed but its document structure is unusable
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Failure reading a dotenv credential file
    #[error("Credential file error: {0}")]
    CredentialFile(#[from] dotenvy::Error),

    /// The service reported an error inside an otherwise valid document
    #[error("Vote Smart API error: {message}")]
    ApiError { message: String },

    /// Invalid input provided
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl VoteSmartError {
    /// Create a new invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a new missing credential error
    pub fn missing_credential(key: impl Into<String>) -> Self {
        Self::MissingCredential { key: key.into() }
    }

    /// Create a new malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api_error(message: impl Into<String>) -> Self {
        Self::ApiError {
            message: message.into(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Check if this error was raised while building a client
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            VoteSmartError::InvalidConfiguration { .. }
                | VoteSmartError::MissingCredential { .. }
                | VoteSmartError::CredentialFile(_)
        )
    }

    /// Check if the request could not be completed at the transport level
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            VoteSmartError::Network(_)
                | VoteSmartError::HttpStatus { .. }
                | VoteSmartError::EmptyResponse
        )
    }

    /// Check if a body was received but could not be parsed
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            VoteSmartError::XmlParsing(_)
                | VoteSmartError::XmlDecoding(_)
                | VoteSmartError::JsonParsing(_)
                | VoteSmartError::MalformedResponse { .. }
        )
    }
}
