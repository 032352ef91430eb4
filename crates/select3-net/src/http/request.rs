//! GET request builder.

use select3_core::logging::targets;

use super::client::HttpClient;
use super::response::HttpResponse;
use crate::error::Result;

/// Builder for constructing GET requests.
pub struct HttpRequestBuilder {
    client: HttpClient,
    url: String,
    headers: http::HeaderMap,
}

impl HttpRequestBuilder {
    pub(crate) fn new(client: HttpClient, url: String) -> Self {
        Self {
            client,
            url,
            headers: http::HeaderMap::new(),
        }
    }

    /// Add a header to the request.
    ///
    /// Invalid header names or values are skipped with a warning.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        match (name.try_into(), value.try_into()) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => {
                tracing::warn!(
                    target: targets::HTTP,
                    url = %self.url,
                    "skipping invalid request header"
                );
            }
        }
        self
    }

    /// The headers set so far.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Send the request and wait for the response.
    ///
    /// The URL must be absolute; a relative or malformed URL fails with
    /// [`NetworkError::InvalidUrl`](crate::NetworkError::InvalidUrl) before
    /// anything is sent.
    pub async fn send(self) -> Result<HttpResponse> {
        let url = url::Url::parse(&self.url)?;
        tracing::debug!(target: targets::HTTP, %url, "sending GET request");

        let response = self
            .client
            .reqwest_client()
            .get(url)
            .headers(self.headers)
            .send()
            .await?;
        tracing::debug!(
            target: targets::HTTP,
            status = response.status().as_u16(),
            "received response"
        );
        Ok(HttpResponse::from_reqwest(response))
    }
}

impl std::fmt::Debug for HttpRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequestBuilder")
            .field("url", &self.url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
