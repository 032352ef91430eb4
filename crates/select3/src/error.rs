//! Error types for the search-select control.

use select3_net::NetworkError;
use thiserror::Error;

/// Errors produced while running a remote search.
///
/// A failed search never touches the control's options; the error is
/// returned from the search call and reported through
/// [`SearchSelect::search_failed`](crate::SearchSelect::search_failed).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// No search source URL prefix is configured.
    #[error("no search source configured")]
    MissingSource,

    /// The request URL could not be constructed.
    #[error("invalid search URL '{url}': {source}")]
    InvalidUrl {
        /// The URL text that failed to parse.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The request failed in transport or returned an error status.
    #[error("search request failed: {0}")]
    Network(#[source] NetworkError),

    /// The response body was not a JSON array of `{login, id}` records.
    #[error("malformed search response: {0}")]
    Decode(String),
}

impl From<NetworkError> for SearchError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Json(message) => SearchError::Decode(message),
            other => SearchError::Network(other),
        }
    }
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors produced while loading a [`SelectConfig`](crate::SelectConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document could not be parsed.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL is not an absolute URL.
    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        /// The rejected URL text.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_network_error_becomes_decode() {
        let err: SearchError = NetworkError::Json("expected array".into()).into();
        assert_eq!(err, SearchError::Decode("expected array".into()));
    }

    #[test]
    fn test_transport_error_stays_network() {
        let err: SearchError = NetworkError::Connection("refused".into()).into();
        assert!(matches!(err, SearchError::Network(NetworkError::Connection(_))));
        assert_eq!(
            err.to_string(),
            "search request failed: Connection error: refused"
        );
    }

    #[test]
    fn test_invalid_url_display() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = SearchError::InvalidUrl {
            url: "not a url".into(),
            source,
        };
        assert!(err.to_string().starts_with("invalid search URL 'not a url'"));
    }
}
