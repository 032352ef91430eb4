//! Control configuration.
//!
//! A [`SelectConfig`] can be built in code, deserialized from TOML or JSON,
//! or parsed from string attributes the way a host document declares them:
//!
//! ```
//! use select3::SelectConfig;
//!
//! let config = SelectConfig::from_attributes([
//!     ("name", "user"),
//!     ("src", "https://example.com/api/users?q="),
//!     ("debounce", "120"),
//!     ("disabled", ""),
//! ]);
//!
//! assert_eq!(config.name.as_deref(), Some("user"));
//! assert_eq!(config.debounce_ms, 120);
//! assert!(config.disabled);
//! ```

use std::time::Duration;

use select3_core::DEFAULT_WAIT;
use select3_core::logging::targets;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// The default debounce period in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = DEFAULT_WAIT.as_millis() as u64;

/// How responses from overlapping searches are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseOrdering {
    /// Every successful response replaces the options when it arrives. A slow
    /// response to an older term can overwrite a newer result.
    #[default]
    Arrival,
    /// Only the response to the most recently issued search is applied;
    /// older responses are discarded.
    Latest,
}

/// Configuration for a [`SearchSelect`](crate::SearchSelect).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Form field name.
    pub name: Option<String>,
    /// Whether the control ignores input.
    pub disabled: bool,
    /// Whether multiple options may be selected.
    pub multiple: bool,
    /// URL prefix the search term is appended to.
    pub src: Option<String>,
    /// Quiet period before a search fires, in milliseconds.
    #[serde(alias = "debounce")]
    pub debounce_ms: u64,
    /// Base a relative `src` is resolved against.
    pub base_url: Option<Url>,
    /// How overlapping search responses are applied.
    pub response_ordering: ResponseOrdering,
    /// Whole-request timeout for HTTP searches, in milliseconds. Unset uses
    /// the HTTP client's default.
    pub request_timeout_ms: Option<u64>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            name: None,
            disabled: false,
            multiple: false,
            src: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            base_url: None,
            response_ordering: ResponseOrdering::default(),
            request_timeout_ms: None,
        }
    }
}

impl SelectConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the form field name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the multiple-selection flag.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set the search URL prefix.
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Set the debounce period in milliseconds.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Set the base URL a relative `src` resolves against.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|source| ConfigError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        self.base_url = Some(parsed);
        Ok(self)
    }

    /// Set the response ordering policy.
    pub fn with_response_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.response_ordering = ordering;
        self
    }

    /// Set the HTTP request timeout in milliseconds.
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }

    /// The debounce period as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The HTTP request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Build a configuration from host attributes.
    ///
    /// Boolean attributes are true when present, whatever their value.
    /// Unknown attributes are ignored.
    pub fn from_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (name, value) in attributes {
            config.apply_attribute(name.as_ref(), Some(value.as_ref()));
        }
        config
    }

    /// Apply a single attribute. `None` means the attribute is absent.
    ///
    /// Returns `false` for attributes the control does not know.
    pub(crate) fn apply_attribute(&mut self, name: &str, value: Option<&str>) -> bool {
        match name {
            "name" => self.name = value.map(str::to_string),
            "disabled" => self.disabled = value.is_some(),
            "multiple" => self.multiple = value.is_some(),
            "src" => self.src = value.map(str::to_string),
            "debounce" => self.debounce_ms = value.map_or(DEFAULT_DEBOUNCE_MS, parse_debounce),
            _ => {
                tracing::trace!(
                    target: targets::SELECT,
                    attribute = name,
                    "ignoring unknown attribute"
                );
                return false;
            }
        }
        true
    }

    /// The attributes this configuration reflects, in declaration order.
    ///
    /// Boolean attributes appear with an empty value when set and are left
    /// out otherwise; `debounce` is always present.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = Vec::new();
        if let Some(name) = &self.name {
            attributes.push(("name", name.clone()));
        }
        if self.disabled {
            attributes.push(("disabled", String::new()));
        }
        if self.multiple {
            attributes.push(("multiple", String::new()));
        }
        if let Some(src) = &self.src {
            attributes.push(("src", src.clone()));
        }
        attributes.push(("debounce", self.debounce_ms.to_string()));
        attributes
    }
}

/// Parse a debounce attribute value.
///
/// Leading whitespace is skipped and the leading run of ASCII digits is used,
/// so `"300ms"` reads as 300. An empty or non-numeric value falls back to the
/// default period.
pub(crate) fn parse_debounce(value: &str) -> u64 {
    if value.is_empty() {
        return DEFAULT_DEBOUNCE_MS;
    }

    let trimmed = value.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    match trimmed[..digits_end].parse::<u64>() {
        Ok(ms) => ms,
        Err(_) => {
            tracing::warn!(
                target: targets::SELECT,
                value,
                default_ms = DEFAULT_DEBOUNCE_MS,
                "debounce attribute is not a number, using default"
            );
            DEFAULT_DEBOUNCE_MS
        }
    }
}
