//! Remote search sources.
//!
//! A [`SearchSource`] turns a request into search records. The request is
//! the control's `src` with the term appended, resolved against `base_url`
//! when one is configured and passed through untouched otherwise, so a
//! source may accept relative paths.
//!
//! [`HttpSearchSource`] is the network implementation and needs an absolute
//! URL. Any `Fn(String) -> impl Future` closure is a source too, which is
//! how tests and embedders plug in canned data.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures_util::future::BoxFuture;
use select3_core::logging::targets;
use select3_net::HttpClient;
use serde::Deserialize;
use url::Url;

use crate::error::{Result, SearchError};
use crate::option::SelectOption;

/// The identifier of a search record, as sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// A string identifier.
    Text(String),
    /// A numeric identifier.
    Number(serde_json::Number),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(text) => f.write_str(text),
            RecordId::Number(number) => write!(f, "{number}"),
        }
    }
}

/// One element of a search response.
///
/// Fields other than `login` and `id` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchRecord {
    /// Becomes the option label.
    pub login: String,
    /// Becomes the option value, in its decimal form when numeric.
    pub id: RecordId,
}

impl SearchRecord {
    /// Create a record with a string id.
    pub fn new(login: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            id: RecordId::Text(id.into()),
        }
    }

    /// Convert into a fresh, unselected option.
    pub fn into_option(self) -> SelectOption {
        SelectOption::new(self.id.to_string(), self.login)
    }
}

/// Something that can answer a search request.
pub trait SearchSource: Send + Sync {
    /// Fetch the records for `request`, the `src` prefix followed by the
    /// search term.
    fn fetch(&self, request: String) -> BoxFuture<'static, Result<Vec<SearchRecord>>>;
}

impl<F, Fut> SearchSource for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<SearchRecord>>> + Send + 'static,
{
    fn fetch(&self, request: String) -> BoxFuture<'static, Result<Vec<SearchRecord>>> {
        Box::pin(self(request))
    }
}

/// A search source that issues HTTP GET requests.
///
/// Requests must be absolute URLs. A relative request fails with
/// [`SearchError::InvalidUrl`] without touching the network.
#[derive(Debug, Clone, Default)]
pub struct HttpSearchSource {
    client: HttpClient,
}

impl HttpSearchSource {
    /// Create a source with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source over an existing client.
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// Create a source whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> select3_net::Result<Self> {
        let client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

impl SearchSource for HttpSearchSource {
    fn fetch(&self, request: String) -> BoxFuture<'static, Result<Vec<SearchRecord>>> {
        let client = self.client.clone();
        Box::pin(async move {
            let url = Url::parse(&request)
                .map_err(|source| SearchError::InvalidUrl { url: request, source })?;

            let records: Vec<SearchRecord> = client
                .get(url.as_str())
                .header("accept", "application/json")
                .send()
                .await?
                .error_for_status_with_body()
                .await?
                .json()
                .await?;

            tracing::debug!(
                target: targets::SEARCH,
                %url,
                count = records.len(),
                "decoded search response"
            );
            Ok(records)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> serde_json::Result<Vec<SearchRecord>> {
        serde_json::from_str(body)
    }

    #[test]
    fn test_decode_numeric_and_string_ids() {
        let records =
            decode(r#"[{"login":"alice","id":7},{"login":"bob","id":"b-2","extra":1}]"#).unwrap();

        let options: Vec<_> = records.into_iter().map(SearchRecord::into_option).collect();
        assert_eq!(options[0].value(), "7");
        assert_eq!(options[0].label(), "alice");
        assert!(!options[0].is_selected());
        assert_eq!(options[1].value(), "b-2");
        assert_eq!(options[1].label(), "bob");
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(decode(r#"{"login":"alice","id":7}"#).is_err());
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        assert!(decode(r#"[{"id":7}]"#).is_err());
        assert!(decode(r#"[{"login":"alice","id":null}]"#).is_err());
    }

    #[tokio::test]
    async fn test_closure_source_receives_relative_request() {
        let source = |request: String| async move {
            Ok::<_, SearchError>(vec![SearchRecord::new(request, "1")])
        };

        let records = source.fetch("/users?q=ali".into()).await.unwrap();
        assert_eq!(records, vec![SearchRecord::new("/users?q=ali", "1")]);
    }

    #[tokio::test]
    async fn test_http_source_with_timeout() {
        let source = HttpSearchSource::with_timeout(Duration::from_millis(1500)).unwrap();
        assert_eq!(source.client().config().timeout, Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_http_source_rejects_relative_request() {
        let source = HttpSearchSource::new();

        let err = source.fetch("/api/users?q=ali".into()).await.unwrap_err();

        assert!(matches!(
            err,
            SearchError::InvalidUrl {
                ref url,
                source: url::ParseError::RelativeUrlWithoutBase,
            } if url == "/api/users?q=ali"
        ));
    }
}
