//! Logging facilities for select3.
//!
//! select3 uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("select3=debug,select3_core::debounce=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "select3_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "select3_core::signal";
    /// Debounce timers target.
    pub const DEBOUNCE: &str = "select3_core::debounce";
    /// Runtime management target.
    pub const RUNTIME: &str = "select3_core::runtime";
    /// Control lifecycle and option list target.
    pub const SELECT: &str = "select3";
    /// Remote search target.
    pub const SEARCH: &str = "select3::search";
    /// HTTP client target.
    pub const HTTP: &str = "select3_net::http";
}

/// A guard that records how long an operation took.
///
/// The elapsed time is logged at `debug`, inside the guard's span, when the
/// guard is dropped. Unlike an entered span the guard is `Send`, so it may be
/// held across `.await` points in spawned futures.
///
/// # Example
///
/// ```
/// use select3_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("search");
///     // ... timed work ...
/// }
/// ```
pub struct PerfSpan {
    name: &'static str,
    started: std::time::Instant,
    span: tracing::Span,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "select3::perf", "perf", operation = name);
        Self {
            name,
            started: std::time::Instant::now(),
            span,
        }
    }

    /// The span timed operations are recorded under.
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        let elapsed_us = self.started.elapsed().as_micros() as u64;
        self.span.in_scope(|| {
            tracing::debug!(
                target: "select3::perf",
                operation = self.name,
                elapsed_us,
                "operation finished"
            );
        });
    }
}
