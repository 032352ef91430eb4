//! HTTP client for select3.
//!
//! This module provides a small async HTTP client built on `reqwest`, used by
//! the search-select control to fetch remote options.
//!
//! # Example
//!
//! ```ignore
//! use select3_net::http::HttpClient;
//!
//! let client = HttpClient::new();
//!
//! let response = client.get("https://api.example.com/users?q=ali").send().await?;
//! println!("Status: {}", response.status());
//! println!("Body: {}", response.text().await?);
//! ```

mod client;
mod request;
mod response;

pub use client::{DEFAULT_TIMEOUT, HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::HttpRequestBuilder;
pub use response::HttpResponse;
