//! Core systems for select3.
//!
//! This crate provides the foundational pieces the search-select control is
//! built from:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Property System**: Reactive properties with change detection
//! - **Debounce**: Rate-limiting wrappers for sync and async functions
//! - **Runtime**: Access to the tokio runtime timers are scheduled on
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use select3_core::Signal;
//!
//! let refresh_requested = Signal::<()>::new();
//!
//! let conn_id = refresh_requested.connect(|_| {
//!     println!("options changed, redraw");
//! });
//!
//! refresh_requested.emit(());
//! refresh_requested.disconnect(conn_id);
//! ```
//!
//! # Debounce Example
//!
//! ```no_run
//! use std::time::Duration;
//! use select3_core::debounce::DebouncedAsync;
//!
//! # async fn fetch(term: String) -> usize { term.len() }
//! # async fn demo() {
//! let search = DebouncedAsync::new(fetch, Duration::from_millis(250));
//!
//! let _superseded = search.call("a".to_string());
//! let last = search.call("ali".to_string());
//!
//! // Only the last call within the window ever settles.
//! assert_eq!(last.await, 3);
//! # }
//! ```

pub mod debounce;
pub mod logging;
pub mod property;
pub mod runtime;
pub mod signal;

pub use debounce::{DEFAULT_WAIT, DebounceHandle, Debounced, DebouncedAsync};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
