//! Type definitions for Vote Smart responses.

use crate::config::OutputType;
use crate::error::{Result, VoteSmartError};
use crate::xml::{parse_xml, XmlElement};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

/// Placeholder written over the token in redacted URLs
pub const REDACTED: &str = "REDACTED";

/// A parsed response body, shaped by the client's output type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "document")]
pub enum ParsedResponse {
    /// Root element of an XML document
    #[serde(rename = "XML")]
    Xml(XmlElement),
    /// Decoded JSON value
    #[serde(rename = "JSON")]
    Json(Value),
}

impl ParsedResponse {
    /// Parse `body` according to `output_type`
    pub fn parse(output_type: OutputType, body: &str) -> Result<Self> {
        match output_type {
            OutputType::Xml => Ok(ParsedResponse::Xml(parse_xml(body)?)),
            OutputType::Json => Ok(ParsedResponse::Json(serde_json::from_str(body)?)),
        }
    }

    /// Format this value was parsed from
    pub fn output_type(&self) -> OutputType {
        match self {
            ParsedResponse::Xml(_) => OutputType::Xml,
            ParsedResponse::Json(_) => OutputType::Json,
        }
    }

    /// XML root element, if this is an XML response
    pub fn as_xml(&self) -> Option<&XmlElement> {
        match self {
            ParsedResponse::Xml(root) => Some(root),
            ParsedResponse::Json(_) => None,
        }
    }

    /// JSON value, if this is a JSON response
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ParsedResponse::Xml(_) => None,
            ParsedResponse::Json(value) => Some(value),
        }
    }

    /// Scalar value at a dotted path below the document root.
    ///
    /// The path addresses the same data in both formats: XML paths start below the root
    /// element and JSON paths start below the single wrapping key (`{"bio": {...}}`).
    /// Numeric segments index into JSON arrays.
    pub fn value_at(&self, path: &str) -> Option<String> {
        match self {
            ParsedResponse::Xml(root) => root.find(path).map(|e| e.text().to_string()),
            ParsedResponse::Json(value) => {
                let mut current = json_root(value);
                if !path.is_empty() {
                    for segment in path.split('.') {
                        current = match current {
                            Value::Object(map) => map.get(segment)?,
                            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                            _ => return None,
                        };
                    }
                }
                match current {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                }
            }
        }
    }
}

/// Strip the single key the service wraps every JSON document in
fn json_root(value: &Value) -> &Value {
    match value {
        Value::Object(map) if map.len() == 1 => map.values().next().unwrap_or(value),
        _ => value,
    }
}

/// Outcome of a single successful query
///
/// The raw body and its parsed form are always present together. Each call produces a fresh
/// result, so results can be kept and compared freely.
#[derive(Clone)]
pub struct QueryResult {
    request_url: Url,
    raw_body: String,
    parsed: ParsedResponse,
    fetched_at: DateTime<Utc>,
}

impl QueryResult {
    /// Validate and parse a response body received for `request_url`.
    ///
    /// Blank bodies and the bare body `0` mean the service produced nothing usable.
    pub(crate) fn from_body(
        output_type: OutputType,
        request_url: Url,
        body: String,
    ) -> Result<Self> {
        if body.trim().is_empty() || body == "0" {
            warn!(url = %redact_url(&request_url), "Empty response body");
            return Err(VoteSmartError::EmptyResponse);
        }

        let parsed = ParsedResponse::parse(output_type, &body).map_err(|e| {
            warn!(
                url = %redact_url(&request_url),
                "Failed to parse {} response: {}", output_type, e
            );
            e
        })?;
        debug!("Parsed {} response of {} bytes", output_type, body.len());

        Ok(Self {
            request_url,
            raw_body: body,
            parsed,
            fetched_at: Utc::now(),
        })
    }

    /// Exact URL dispatched, including the API token.
    ///
    /// Do not log this verbatim; use [`QueryResult::redacted_url`] instead.
    pub fn request_url(&self) -> &Url {
        &self.request_url
    }

    /// Dispatched URL with the token replaced by [`REDACTED`]
    pub fn redacted_url(&self) -> Url {
        redact_url(&self.request_url)
    }

    /// Unparsed response text
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Parsed response
    pub fn parsed(&self) -> &ParsedResponse {
        &self.parsed
    }

    /// Consume the result, keeping only the parsed response
    pub fn into_parsed(self) -> ParsedResponse {
        self.parsed
    }

    /// Format of this response
    pub fn output_type(&self) -> OutputType {
        self.parsed.output_type()
    }

    /// XML root element, if this is an XML response
    pub fn as_xml(&self) -> Option<&XmlElement> {
        self.parsed.as_xml()
    }

    /// JSON value, if this is a JSON response
    pub fn as_json(&self) -> Option<&Value> {
        self.parsed.as_json()
    }

    /// When the response was received
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Error message the service embedded in the document, if any.
    ///
    /// The service reports bad input as a normal document rooted at `error`.
    pub fn error_message(&self) -> Option<String> {
        self.parsed
            .value_at("errorMessage")
            .filter(|message| !message.is_empty())
    }

    /// Decode the document into a typed record.
    ///
    /// XML is decoded from the raw body with the root element as the record; JSON is decoded
    /// from the value below the single wrapping key so the same type works for both formats.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.parsed {
            ParsedResponse::Xml(_) => Ok(quick_xml::de::from_str(&self.raw_body)?),
            ParsedResponse::Json(value) => Ok(T::deserialize(json_root(value))?),
        }
    }
}

impl fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("request_url", &self.redacted_url().as_str())
            .field("raw_body", &self.raw_body)
            .field("parsed", &self.parsed)
            .field("fetched_at", &self.fetched_at)
            .finish()
    }
}

/// Copy of `url` with the `key` query parameter replaced by [`REDACTED`]
pub fn redact_url(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted
}

/// Response to `CandidateBio.getBio`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CandidateBio {
    /// Page title and link back to votesmart.org
    #[serde(rename = "generalInfo")]
    pub general_info: Option<GeneralInfo>,

    /// Personal details
    #[serde(rename = "candidate")]
    pub candidate: Candidate,

    /// Current office, absent for candidates not holding one
    #[serde(rename = "office")]
    pub office: Option<Office>,
}

/// Attribution block included in every response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralInfo {
    #[serde(rename = "title")]
    pub title: Option<String>,

    #[serde(rename = "linkBack")]
    pub link_back: Option<String>,
}

/// Candidate biography
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Candidate {
    #[serde(rename = "candidateId")]
    pub candidate_id: Option<String>,

    #[serde(rename = "firstName")]
    pub first_name: Option<String>,

    #[serde(rename = "nickName")]
    pub nick_name: Option<String>,

    #[serde(rename = "middleName")]
    pub middle_name: Option<String>,

    #[serde(rename = "lastName")]
    pub last_name: Option<String>,

    #[serde(rename = "suffix")]
    pub suffix: Option<String>,

    #[serde(rename = "birthDate")]
    pub birth_date: Option<String>,

    #[serde(rename = "birthPlace")]
    pub birth_place: Option<String>,

    #[serde(rename = "gender")]
    pub gender: Option<String>,

    /// Photo URL
    #[serde(rename = "photo")]
    pub photo: Option<String>,

    #[serde(rename = "homeCity")]
    pub home_city: Option<String>,

    #[serde(rename = "homeState")]
    pub home_state: Option<String>,

    #[serde(rename = "profession")]
    pub profession: Option<String>,
}

impl Candidate {
    /// First, middle, last name and suffix joined by spaces, skipping blanks
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.suffix,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Photo URL if one is on file
    pub fn photo_url(&self) -> Option<&str> {
        self.photo.as_deref().filter(|photo| !photo.trim().is_empty())
    }
}

/// Office currently held
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Office {
    #[serde(rename = "name")]
    pub name: Option<String>,

    #[serde(rename = "parties")]
    pub parties: Option<String>,

    #[serde(rename = "title")]
    pub title: Option<String>,

    #[serde(rename = "district")]
    pub district: Option<String>,

    #[serde(rename = "termStart")]
    pub term_start: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERROR_XML: &str =
        "<error><errorMessage>No bio found for candidate.</errorMessage></error>";

    fn url() -> Url {
        Url::parse("http://api.votesmart.org/CandidateBio.getBio?key=T1&o=XML&candidateId=9026")
            .unwrap()
    }

    #[test]
    fn test_redact_url() {
        let redacted = redact_url(&url());
        assert_eq!(
            redacted.as_str(),
            "http://api.votesmart.org/CandidateBio.getBio?key=REDACTED&o=XML&candidateId=9026"
        );
        assert!(!redacted.as_str().contains("T1"));
    }

    #[test]
    fn test_debug_hides_token() {
        let result = QueryResult::from_body(OutputType::Xml, url(), "<bio/>".to_string()).unwrap();
        assert_eq!(result.request_url().query_pairs().next().unwrap().1, "T1");
        assert!(!format!("{:?}", result).contains("key=T1"));
    }

    #[test]
    fn test_empty_body_rejected() {
        for output_type in [OutputType::Xml, OutputType::Json] {
            for body in ["", "   \n", "0"] {
                let err = QueryResult::from_body(output_type, url(), body.to_string()).unwrap_err();
                assert!(matches!(err, VoteSmartError::EmptyResponse));
            }
        }

        let result = QueryResult::from_body(OutputType::Json, url(), "10".to_string()).unwrap();
        assert_eq!(result.as_json(), Some(&serde_json::json!(10)));
    }

    #[test]
    fn test_error_message_detection() {
        let result = QueryResult::from_body(OutputType::Xml, url(), ERROR_XML.to_string()).unwrap();
        assert_eq!(
            result.error_message().as_deref(),
            Some("No bio found for candidate.")
        );

        let json = r#"{"error":{"errorMessage":"Authorization failed"}}"#;
        let result = QueryResult::from_body(OutputType::Json, url(), json.to_string()).unwrap();
        assert_eq!(result.error_message().as_deref(), Some("Authorization failed"));

        let ok = QueryResult::from_body(OutputType::Xml, url(), "<bio/>".to_string()).unwrap();
        assert_eq!(ok.error_message(), None);
    }

    #[test]
    fn test_json_value_at() {
        let parsed = ParsedResponse::parse(
            OutputType::Json,
            r#"{"candidateList":{"candidate":[{"candidateId":"1"},{"candidateId":2}],"open":true}}"#,
        )
        .unwrap();

        assert_eq!(parsed.value_at("candidate.0.candidateId").as_deref(), Some("1"));
        assert_eq!(parsed.value_at("candidate.1.candidateId").as_deref(), Some("2"));
        assert_eq!(parsed.value_at("open").as_deref(), Some("true"));
        assert_eq!(parsed.value_at("candidate"), None);
        assert_eq!(parsed.value_at("candidate.x"), None);
    }

    #[test]
    fn test_full_name() {
        let mut candidate = Candidate {
            first_name: Some("Jane".to_string()),
            middle_name: Some("".to_string()),
            last_name: Some("Doe".to_string()),
            suffix: Some("Jr.".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.full_name(), Some("Jane Doe Jr.".to_string()));

        candidate.suffix = None;
        assert_eq!(candidate.full_name(), Some("Jane Doe".to_string()));

        assert_eq!(Candidate::default().full_name(), None);
        assert_eq!(candidate.photo_url(), None);
    }
}
