//! Networking module for select3.
//!
//! This crate provides the HTTP client the search-select control uses to
//! fetch remote options:
//!
//! ```ignore
//! use select3_net::http::HttpClient;
//!
//! let client = HttpClient::new();
//!
//! let response = client
//!     .get("https://api.example.com/users?q=ali")
//!     .header("Accept", "application/json")
//!     .send()
//!     .await?
//!     .error_for_status_with_body()
//!     .await?;
//!
//! let users: Vec<User> = response.json().await?;
//! ```
//!
//! ## Configuration
//!
//! ```ignore
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! ```

mod error;
pub mod http;

pub use error::{NetworkError, Result};

pub use http::{
    DEFAULT_TIMEOUT, HttpClient, HttpClientBuilder, HttpClientConfig, HttpRequestBuilder,
    HttpResponse,
};
