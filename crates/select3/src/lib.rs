//! select3: a debounced search-select form control.
//!
//! The control keeps one ordered list of options fed by projected children,
//! programmatic [`add`](SearchSelect::add)/[`remove`](SearchSelect::remove),
//! and remote searches. Input is debounced per control, so a burst of
//! keystrokes issues a single request for the final term.
//!
//! Rendering is left to the host: it reads [`SearchSelect::options`] (or
//! [`SearchSelect::snapshot`]) and redraws whenever
//! [`SearchSelect::refresh_requested`] fires.
//!
//! # Example
//!
//! ```no_run
//! use select3::{SearchSelect, SelectConfig, SelectOption, SlotNode};
//!
//! # async fn demo() {
//! let select = SearchSelect::with_http(
//!     SelectConfig::from_attributes([
//!         ("name", "user"),
//!         ("src", "https://example.com/api/users?q="),
//!     ]),
//! );
//!
//! select.handle_slot_change(&[
//!     SlotNode::option("anyone", "Anyone"),
//!     SlotNode::Group(vec![SlotNode::option("me", "Me")]),
//! ]);
//! select.add(SelectOption::new("admin", "Administrator"));
//! select.set_value("me");
//! assert_eq!(select.value().as_deref(), Some("me"));
//!
//! // Replaces every option with the search results.
//! if let Some(search) = select.handle_input("ali") {
//!     let _ = search.await;
//! }
//! # }
//! ```

pub mod config;
mod error;
pub mod form;
mod option;
mod search_select;
pub mod slot;
pub mod source;

pub use config::{ResponseOrdering, SelectConfig};
pub use error::{ConfigError, Result, SearchError};
pub use form::{DetachedInternals, FormInternals, FormRef, ValidityState};
pub use option::{OptionSnapshot, SelectOption};
pub use search_select::{SearchOutcome, SearchSelect, SearchState};
pub use slot::SlotNode;
pub use source::{HttpSearchSource, RecordId, SearchRecord, SearchSource};

pub use select3_core::DebounceHandle;
