//! The search-select control.
//!
//! [`SearchSelect`] owns an ordered option list fed from three places:
//! options projected by the host, options added through the API, and the
//! results of remote searches. Typing into the control goes through
//! [`SearchSelect::handle_input`], which debounces the term and runs one
//! search once the user pauses.
//!
//! # Example
//!
//! ```no_run
//! use select3::{HttpSearchSource, SearchSelect, SelectConfig};
//!
//! # async fn demo() {
//! let select = SearchSelect::new(
//!     SelectConfig::new()
//!         .with_name("user")
//!         .with_src("https://example.com/api/users?q="),
//!     HttpSearchSource::new(),
//! );
//!
//! select.refresh_requested().connect(|_| {
//!     // Redraw the option list.
//! });
//!
//! select.handle_input("a");
//! select.handle_input("al");
//! if let Some(handle) = select.handle_input("ali") {
//!     let outcome = handle.await;
//!     println!("{outcome:?}, {} options", select.len());
//! }
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use select3_core::logging::targets;
use select3_core::{DebounceHandle, DebouncedAsync, PerfSpan, Property, Signal};
use tracing::Instrument;
use url::Url;

use crate::config::{ResponseOrdering, SelectConfig};
use crate::error::{Result, SearchError};
use crate::form::{self, DetachedInternals, FormInternals, FormRef, ValidityState};
use crate::option::{OptionSnapshot, SelectOption};
use crate::slot::{self, SlotNode};
use crate::source::{HttpSearchSource, SearchRecord, SearchSource};

/// Where the control is in its search cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchState {
    /// Nothing scheduled, nothing in flight.
    #[default]
    Idle,
    /// A search is scheduled and waiting for the input to settle.
    Debouncing,
    /// At least one request is in flight.
    Fetching,
}

/// What a completed search did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The options were replaced by `count` results.
    Replaced {
        /// Number of options after the replace.
        count: usize,
    },
    /// A newer search was issued before this one completed, so its results
    /// were dropped. Only reported with [`ResponseOrdering::Latest`].
    Stale,
}

#[derive(Debug, Default)]
struct Activity {
    debouncing: bool,
    /// Bumped by every input; a timer only ends the debouncing phase it
    /// was armed for.
    generation: u64,
    in_flight: usize,
}

impl Activity {
    fn state(&self) -> SearchState {
        if self.debouncing {
            SearchState::Debouncing
        } else if self.in_flight > 0 {
            SearchState::Fetching
        } else {
            SearchState::Idle
        }
    }
}

/// State shared between the control and its scheduled searches.
struct Shared {
    name: Property<Option<String>>,
    disabled: Property<bool>,
    multiple: Property<bool>,
    src: Property<Option<String>>,
    debounce_ms: u64,
    base_url: Option<Url>,
    ordering: ResponseOrdering,
    request_timeout_ms: Option<u64>,

    options: Mutex<Vec<SelectOption>>,
    activity: Mutex<Activity>,
    /// Sequence number of the most recently issued search.
    issued: AtomicU64,

    source: Box<dyn SearchSource>,
    internals: Box<dyn FormInternals>,

    refresh_requested: Signal<()>,
    state_changed: Signal<SearchState>,
    search_failed: Signal<String>,
}

impl Shared {
    fn update_activity<R>(&self, update: impl FnOnce(&mut Activity) -> R) -> R {
        let (before, after, output) = {
            let mut activity = self.activity.lock();
            let before = activity.state();
            let output = update(&mut activity);
            (before, activity.state(), output)
        };

        if before != after {
            tracing::trace!(target: targets::SEARCH, ?before, ?after, "search state changed");
            self.state_changed.emit(after);
        }
        output
    }

    /// The request handed to the source: `src` followed by the term,
    /// resolved against `base_url` when one is configured.
    fn request(&self, term: &str) -> Result<String> {
        let src = self.src.get().ok_or(SearchError::MissingSource)?;
        let raw = format!("{src}{term}");
        match &self.base_url {
            Some(base) => base
                .join(&raw)
                .map(String::from)
                .map_err(|source| SearchError::InvalidUrl { url: raw, source }),
            None => Ok(raw),
        }
    }

    fn request_refresh(&self) {
        self.refresh_requested.emit(());
    }

    /// Issue a search. `scheduled` carries the input generation of searches
    /// fired by the debounce timer; such a search ends the debouncing phase
    /// unless newer input has re-armed the timer.
    ///
    /// Bookkeeping happens before the future is returned, so the state
    /// reads `Fetching` from the moment the search is issued.
    fn search(
        self: Arc<Self>,
        term: String,
        scheduled: Option<u64>,
    ) -> impl Future<Output = Result<SearchOutcome>> + Send + 'static {
        let seq = self.issued.fetch_add(1, Ordering::AcqRel) + 1;
        self.update_activity(|activity| {
            if scheduled == Some(activity.generation) {
                activity.debouncing = false;
            }
            activity.in_flight += 1;
        });
        let in_flight = InFlight(self);

        async move {
            let shared = &in_flight.0;
            let perf = PerfSpan::new("search");
            tracing::debug!(target: targets::SEARCH, term = %term, seq, "searching");

            let result = shared
                .fetch_and_commit(seq, &term)
                .instrument(perf.span().clone())
                .await;

            if let Err(err) = &result {
                tracing::warn!(
                    target: targets::SEARCH,
                    term = %term,
                    error = %err,
                    "search failed"
                );
                shared.search_failed.emit(err.to_string());
            }
            drop(in_flight);
            result
        }
    }

    async fn fetch_and_commit(&self, seq: u64, term: &str) -> Result<SearchOutcome> {
        let request = self.request(term)?;
        let records = self.source.fetch(request).await?;
        let replacement: Vec<SelectOption> =
            records.into_iter().map(SearchRecord::into_option).collect();

        let superseded = self.issued.load(Ordering::Acquire) != seq;
        if self.ordering == ResponseOrdering::Latest && superseded {
            tracing::debug!(target: targets::SEARCH, term, seq, "dropping stale search response");
            return Ok(SearchOutcome::Stale);
        }

        let count = replacement.len();
        *self.options.lock() = replacement;
        tracing::debug!(target: targets::SELECT, count, "options replaced by search results");
        self.request_refresh();

        Ok(SearchOutcome::Replaced { count })
    }
}

/// Counts one request as in flight until dropped, including when the search
/// future is dropped before completing.
struct InFlight(Arc<Shared>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.update_activity(|activity| activity.in_flight -= 1);
    }
}

/// A search-driven select form control.
///
/// Cloning is not supported; share the control behind an `Arc` if several
/// owners need it. Dropping the control cancels a scheduled search. Searches
/// already in flight run to completion.
///
/// # Signals
///
/// - [`refresh_requested`](Self::refresh_requested): the option list or the
///   selection changed and the view should be redrawn.
/// - [`state_changed`](Self::state_changed): the [`SearchState`] changed.
/// - [`search_failed`](Self::search_failed): a search failed; carries the
///   error message.
pub struct SearchSelect {
    shared: Arc<Shared>,
    debounced_search: DebouncedAsync<(String, u64), Result<SearchOutcome>>,
}

impl SearchSelect {
    /// Create a control that is not associated with a form.
    pub fn new(config: SelectConfig, source: impl SearchSource + 'static) -> Self {
        Self::with_internals(config, source, DetachedInternals)
    }

    /// Create a control that searches over HTTP, honoring the configured
    /// request timeout.
    pub fn with_http(config: SelectConfig) -> Self {
        let source = match config.request_timeout() {
            Some(timeout) => HttpSearchSource::with_timeout(timeout).unwrap_or_else(|err| {
                tracing::warn!(
                    target: targets::SELECT,
                    error = %err,
                    "could not apply request timeout, using default HTTP client"
                );
                HttpSearchSource::new()
            }),
            None => HttpSearchSource::new(),
        };
        Self::new(config, source)
    }

    /// Create a control from host attributes.
    pub fn from_attributes<I, K, V>(attributes: I, source: impl SearchSource + 'static) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::new(SelectConfig::from_attributes(attributes), source)
    }

    /// Create a control with host-provided form internals.
    ///
    /// Must be called within a tokio runtime, or with the global runtime
    /// available (see [`select3_core::runtime`]).
    pub fn with_internals(
        config: SelectConfig,
        source: impl SearchSource + 'static,
        internals: impl FormInternals + 'static,
    ) -> Self {
        let shared = Arc::new(Shared {
            name: Property::new(config.name.clone()),
            disabled: Property::new(config.disabled),
            multiple: Property::new(config.multiple),
            src: Property::new(config.src.clone()),
            debounce_ms: config.debounce_ms,
            base_url: config.base_url.clone(),
            ordering: config.response_ordering,
            request_timeout_ms: config.request_timeout_ms,
            options: Mutex::new(Vec::new()),
            activity: Mutex::new(Activity::default()),
            issued: AtomicU64::new(0),
            source: Box::new(source),
            internals: Box::new(internals),
            refresh_requested: Signal::new(),
            state_changed: Signal::new(),
            search_failed: Signal::new(),
        });

        let fire = Arc::clone(&shared);
        let debounced_search = DebouncedAsync::new(
            move |(term, generation): (String, u64)| {
                Arc::clone(&fire).search(term, Some(generation))
            },
            config.debounce(),
        );

        tracing::debug!(
            target: targets::SELECT,
            name = ?config.name,
            src = ?config.src,
            debounce_ms = config.debounce_ms,
            "search select created"
        );

        Self {
            shared,
            debounced_search,
        }
    }

    /// The kind of control, as reported to forms.
    pub fn type_name(&self) -> &'static str {
        form::TYPE_NAME
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// A copy of the option list. Handles share identity with the stored
    /// options.
    pub fn options(&self) -> Vec<SelectOption> {
        self.shared.options.lock().clone()
    }

    /// The current state of every option, in order.
    pub fn snapshot(&self) -> Vec<OptionSnapshot> {
        self.shared
            .options
            .lock()
            .iter()
            .map(SelectOption::snapshot)
            .collect()
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.shared.options.lock().len()
    }

    /// Whether there are no options.
    pub fn is_empty(&self) -> bool {
        self.shared.options.lock().is_empty()
    }

    /// Append an option.
    pub fn add(&self, option: SelectOption) {
        tracing::trace!(target: targets::SELECT, value = option.value(), "adding option");
        self.shared.options.lock().push(option);
        self.shared.request_refresh();
    }

    /// Remove every entry that is the same option as `option`.
    ///
    /// Returns `false`, without requesting a refresh, if none was found.
    pub fn remove(&self, option: &SelectOption) -> bool {
        let removed = {
            let mut options = self.shared.options.lock();
            let before = options.len();
            options.retain(|o| !o.ptr_eq(option));
            before - options.len()
        };

        if removed == 0 {
            return false;
        }
        tracing::trace!(target: targets::SELECT, value = option.value(), removed, "removed option");
        self.shared.request_refresh();
        true
    }

    /// Append options projected by the host, in order.
    pub fn handle_options_projected(&self, projected: impl IntoIterator<Item = SelectOption>) {
        let added = {
            let mut options = self.shared.options.lock();
            let before = options.len();
            options.extend(projected);
            options.len() - before
        };

        tracing::debug!(target: targets::SELECT, added, "options projected");
        if added > 0 {
            self.shared.request_refresh();
        }
    }

    /// Take the options out of a projected node tree.
    pub fn handle_slot_change(&self, nodes: &[SlotNode]) {
        self.handle_options_projected(slot::flatten_options(nodes));
    }

    // =========================================================================
    // Value
    // =========================================================================

    /// The value of the first selected option.
    pub fn value(&self) -> Option<String> {
        self.shared
            .options
            .lock()
            .iter()
            .find(|o| o.is_selected())
            .map(|o| o.value().to_string())
    }

    /// Select exactly the options whose value equals `value`.
    ///
    /// Every other option is deselected, so setting a value no option has
    /// clears the selection.
    pub fn set_value(&self, value: &str) {
        let matched = {
            let options = self.shared.options.lock();
            let mut matched = 0;
            for option in options.iter() {
                let selected = option.value() == value;
                option.set_selected(selected);
                matched += usize::from(selected);
            }
            matched
        };

        tracing::trace!(target: targets::SELECT, value, matched, "value set");
        self.shared.request_refresh();
    }

    /// The values of all selected options, in order.
    pub fn selected_values(&self) -> Vec<String> {
        self.shared
            .options
            .lock()
            .iter()
            .filter(|o| o.is_selected())
            .map(|o| o.value().to_string())
            .collect()
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Handle a change of the search input.
    ///
    /// Returns `None` when the control is disabled. Otherwise the term is
    /// debounced and the returned handle settles with the search result if
    /// no further input arrives within the debounce period.
    pub fn handle_input(
        &self,
        term: impl Into<String>,
    ) -> Option<DebounceHandle<Result<SearchOutcome>>> {
        let term = term.into();
        if self.shared.disabled.get() {
            tracing::debug!(target: targets::SEARCH, term = %term, "ignoring input while disabled");
            return None;
        }

        tracing::trace!(target: targets::SEARCH, term = %term, "input changed");
        let generation = self.shared.update_activity(|activity| {
            activity.generation += 1;
            activity.debouncing = true;
            activity.generation
        });
        Some(self.debounced_search.call((term, generation)))
    }

    /// Run a search immediately, bypassing the debounce period.
    ///
    /// Runs even when the control is disabled. On success the options are
    /// replaced by the results; on failure they are left untouched.
    pub fn search(
        &self,
        term: impl Into<String>,
    ) -> impl Future<Output = Result<SearchOutcome>> + Send + 'static {
        Arc::clone(&self.shared).search(term.into(), None)
    }

    /// Drop a scheduled search that has not started yet.
    pub fn cancel_pending_search(&self) -> bool {
        let cancelled = self.debounced_search.cancel();
        self.shared
            .update_activity(|activity| activity.debouncing = false);
        cancelled
    }

    /// Current search state.
    pub fn state(&self) -> SearchState {
        self.shared.activity.lock().state()
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// The form field name.
    pub fn name(&self) -> Option<String> {
        self.shared.name.get()
    }

    /// Set the form field name.
    pub fn set_name(&self, name: Option<String>) {
        self.shared.name.set(name);
    }

    /// Whether the control is disabled.
    pub fn is_disabled(&self) -> bool {
        self.shared.disabled.get()
    }

    /// Enable or disable the control.
    ///
    /// Disabling drops a scheduled search that has not started yet.
    pub fn set_disabled(&self, disabled: bool) {
        if !self.shared.disabled.set(disabled) {
            return;
        }
        if disabled && self.cancel_pending_search() {
            tracing::debug!(target: targets::SEARCH, "dropped scheduled search on disable");
        }
        self.shared.request_refresh();
    }

    /// Whether multiple options may be selected.
    pub fn is_multiple(&self) -> bool {
        self.shared.multiple.get()
    }

    /// Set whether multiple options may be selected.
    pub fn set_multiple(&self, multiple: bool) {
        if self.shared.multiple.set(multiple) {
            self.shared.request_refresh();
        }
    }

    /// The search URL prefix.
    pub fn src(&self) -> Option<String> {
        self.shared.src.get()
    }

    /// Set the search URL prefix. Applies to searches issued afterwards.
    pub fn set_src(&self, src: Option<String>) {
        self.shared.src.set(src);
    }

    /// The debounce period, fixed at construction.
    pub fn debounce(&self) -> Duration {
        self.debounced_search.wait()
    }

    /// How overlapping search responses are applied.
    pub fn response_ordering(&self) -> ResponseOrdering {
        self.shared.ordering
    }

    /// Apply a host attribute change. `None` means the attribute was removed.
    pub fn attribute_changed(&self, name: &str, value: Option<&str>) {
        match name {
            "name" => self.set_name(value.map(str::to_string)),
            "disabled" => self.set_disabled(value.is_some()),
            "multiple" => self.set_multiple(value.is_some()),
            "src" => self.set_src(value.map(str::to_string)),
            "debounce" => {
                tracing::debug!(
                    target: targets::SELECT,
                    ?value,
                    debounce_ms = self.shared.debounce_ms,
                    "debounce is fixed at construction, ignoring change"
                );
            }
            _ => {
                tracing::trace!(
                    target: targets::SELECT,
                    attribute = name,
                    "ignoring unknown attribute"
                );
            }
        }
    }

    /// The attributes the control reflects to its host.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        self.config().attributes()
    }

    /// The control's current configuration.
    pub fn config(&self) -> SelectConfig {
        SelectConfig {
            name: self.name(),
            disabled: self.is_disabled(),
            multiple: self.is_multiple(),
            src: self.src(),
            debounce_ms: self.shared.debounce_ms,
            base_url: self.shared.base_url.clone(),
            response_ordering: self.shared.ordering,
            request_timeout_ms: self.shared.request_timeout_ms,
        }
    }

    // =========================================================================
    // Form participation
    // =========================================================================

    /// The form the control belongs to.
    pub fn form(&self) -> Option<FormRef> {
        self.shared.internals.form()
    }

    /// The host's validity flags.
    pub fn validity(&self) -> ValidityState {
        self.shared.internals.validity()
    }

    /// The host's validation message.
    pub fn validation_message(&self) -> String {
        self.shared.internals.validation_message()
    }

    /// Whether the control takes part in constraint validation.
    pub fn will_validate(&self) -> bool {
        self.shared.internals.will_validate()
    }

    /// Check validity without reporting.
    pub fn check_validity(&self) -> bool {
        self.shared.internals.check_validity()
    }

    /// Check validity and report problems to the user.
    pub fn report_validity(&self) -> bool {
        self.shared.internals.report_validity()
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted when the view should be redrawn.
    pub fn refresh_requested(&self) -> &Signal<()> {
        &self.shared.refresh_requested
    }

    /// Emitted when the search state changes.
    pub fn state_changed(&self) -> &Signal<SearchState> {
        &self.shared.state_changed
    }

    /// Emitted with the error message when a search fails.
    pub fn search_failed(&self) -> &Signal<String> {
        &self.shared.search_failed
    }
}

impl fmt::Debug for SearchSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSelect")
            .field("name", &self.name())
            .field("src", &self.src())
            .field("options", &self.len())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
