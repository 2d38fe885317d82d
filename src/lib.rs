//! # Vote Smart API Client
//!
//! A Rust client library for the Vote Smart legislative and candidate information API.
//!
//! Every call is a single HTTP GET of the form
//! `{base}/{method}?key={token}&o={XML|JSON}[&name=value]*`. The response body is kept verbatim
//! next to its parsed form so it can be inspected when something looks off.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use votesmart::{ClientConfig, OutputType, VoteSmartClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env(OutputType::Xml)?;
//!     let client = VoteSmartClient::new(config)?;
//!
//!     let result = client
//!         .query("CandidateBio.getBio", [("candidateId", "9026")])
//!         .await?;
//!
//!     if let Some(message) = result.error_message() {
//!         eprintln!("Vote Smart error: {}", message);
//!     } else if let Some(name) = result.parsed().value_at("candidate.firstName") {
//!         println!("First name: {}", name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! The token is resolved once while building a [`ClientConfig`], either passed in directly or
//! looked up in a [`CredentialSource`] such as the process environment (`VOTESMART_API_KEY` by
//! default) or a dotenv file. The token travels in the query string, so
//! [`QueryResult::request_url`] contains it; log [`QueryResult::redacted_url`] instead.
//!
//! ## Concurrency
//!
//! Clients hold no per-call state. Each `query` returns its own [`QueryResult`], so a client can
//! be cloned or shared across tasks. Enable the `blocking` feature for a thread-blocking client.

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod xml;

pub use client::VoteSmartClient;
pub use config::{
    resolve_token, validate_output_type, ClientConfig, CredentialSource, DotenvCredentials,
    EnvCredentials, OutputType, SUPPORTED_OUTPUT_TYPES,
};
pub use error::{Result, VoteSmartError};
pub use types::{Candidate, CandidateBio, GeneralInfo, Office, ParsedResponse, QueryResult};
pub use xml::{parse_xml, XmlElement};

/// Re-export commonly used types from chrono for convenience
pub use chrono::{DateTime, Utc};

/// The default base URL for the Vote Smart API
pub const DEFAULT_BASE_URL: &str = "http://api.votesmart.org";

/// Default credential key holding the API token
pub const DEFAULT_ENV_KEY: &str = "VOTESMART_API_KEY";

/// Default user agent string for requests
pub const DEFAULT_USER_AGENT: &str = concat!("votesmart-rs/", env!("CARGO_PKG_VERSION"));

#[allow(clippy::const_is_empty)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(!DEFAULT_BASE_URL.is_empty());
        assert_eq!(DEFAULT_ENV_KEY, "VOTESMART_API_KEY");
        assert!(DEFAULT_USER_AGENT.contains("votesmart-rs"));
        assert_eq!(SUPPORTED_OUTPUT_TYPES.len(), 2);
    }
}
