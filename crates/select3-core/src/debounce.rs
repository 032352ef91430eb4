//! Debouncing for sync and async functions.
//!
//! A debounced wrapper delays invocation of a target function until a quiet
//! period has elapsed, collapsing a burst of calls into one invocation with
//! the arguments of the last call.
//!
//! Two wrapper kinds exist, chosen when the wrapper is created:
//!
//! - [`Debounced`] wraps a synchronous target. [`Debounced::call`] schedules
//!   the invocation and returns immediately.
//! - [`DebouncedAsync`] wraps a target returning a future.
//!   [`DebouncedAsync::call`] returns a [`DebounceHandle`] that settles with
//!   the target's output once the delayed invocation completes.
//!
//! Every wrapper owns exactly one pending-timer slot. Wrappers never share
//! timer state, so each control instance keeps its own.
//!
//! # Abandoned handles
//!
//! Only the handle returned by the last call before the quiet period ever
//! settles. Handles from superseded calls are *abandoned*: awaiting them never
//! completes. This is not an error. Callers that need timely completion
//! should only await the most recent handle, or check
//! [`DebounceHandle::is_abandoned`] first.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//! use select3_core::Debounced;
//!
//! # async fn demo() {
//! let fired = Arc::new(AtomicUsize::new(0));
//! let fired_clone = Arc::clone(&fired);
//! let save = Debounced::new(
//!     move |_: String| {
//!         fired_clone.fetch_add(1, Ordering::SeqCst);
//!     },
//!     Duration::from_millis(250),
//! );
//!
//! save.call("a".into());
//! save.call("ab".into());
//! tokio::time::sleep(Duration::from_millis(300)).await;
//! assert_eq!(fired.load(Ordering::SeqCst), 1);
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::logging::targets;

/// The default quiet period.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(250);

/// The single pending-timer slot owned by a wrapper.
struct TimerSlot {
    wait: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl TimerSlot {
    fn new(wait: Duration) -> Self {
        Self {
            wait,
            runtime: crate::runtime::handle(),
            pending: Mutex::new(None),
        }
    }

    /// Cancel any armed timer and arm a new one that runs `fire` after the
    /// quiet period.
    ///
    /// `fire` runs synchronously once the sleep completes, so aborting the
    /// timer task can only ever cancel the sleep, never a started invocation.
    fn arm<F>(&self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let wait = self.wait;
        let deadline = tokio::time::Instant::now() + wait;
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take()
            && !previous.is_finished()
        {
            tracing::trace!(target: targets::DEBOUNCE, "superseding pending invocation");
            previous.abort();
        }

        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tracing::trace!(
                target: targets::DEBOUNCE,
                wait_ms = wait.as_millis() as u64,
                "quiet period elapsed"
            );
            fire();
        }));
    }

    fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(previous) if !previous.is_finished() => {
                previous.abort();
                true
            }
            _ => false,
        }
    }

    fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.get_mut().take() {
            timer.abort();
        }
    }
}

/// A debounced synchronous function.
///
/// Calling [`call`](Self::call) restarts the quiet period; the target runs
/// once, with the last arguments, after `wait` passes without another call.
pub struct Debounced<A> {
    func: Arc<dyn Fn(A) + Send + Sync>,
    slot: TimerSlot,
}

impl<A: Send + 'static> Debounced<A> {
    /// Wrap `func` with the given quiet period.
    ///
    /// Timers are scheduled on the runtime the caller is running in, or on
    /// the global runtime when created outside of one.
    pub fn new<F>(func: F, wait: Duration) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            slot: TimerSlot::new(wait),
        }
    }

    /// Schedule an invocation with `args`, superseding any pending one.
    pub fn call(&self, args: A) {
        let func = Arc::clone(&self.func);
        self.slot.arm(move || func(args));
    }

    /// Drop the pending invocation, if any.
    ///
    /// Returns `true` if a timer was armed.
    pub fn cancel(&self) -> bool {
        self.slot.cancel()
    }

    /// Whether an invocation is scheduled but has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }

    /// The configured quiet period.
    pub fn wait(&self) -> Duration {
        self.slot.wait
    }
}

impl<A> fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.slot.wait)
            .finish_non_exhaustive()
    }
}

/// The result sender of the most recent call. Emptied when the call is
/// superseded or cancelled, and taken by the timer when it fires.
type SenderCell<T> = Arc<Mutex<Option<oneshot::Sender<T>>>>;

/// A debounced asynchronous function.
///
/// Each call returns a [`DebounceHandle`]; only the handle of the last call
/// within a burst settles.
pub struct DebouncedAsync<A, T> {
    func: Arc<dyn Fn(A) -> BoxFuture<'static, T> + Send + Sync>,
    slot: TimerSlot,
    latest: Mutex<Option<SenderCell<T>>>,
}

impl<A: Send + 'static, T: Send + 'static> DebouncedAsync<A, T> {
    /// Wrap the async `func` with the given quiet period.
    pub fn new<F, Fut>(func: F, wait: Duration) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self {
            func: Arc::new(move |args: A| -> BoxFuture<'static, T> { Box::pin(func(args)) }),
            slot: TimerSlot::new(wait),
            latest: Mutex::new(None),
        }
    }

    /// Abandon the handle of the previous call, if it has not fired yet.
    fn supersede(&self, next: Option<SenderCell<T>>) {
        let previous = std::mem::replace(&mut *self.latest.lock(), next);
        if let Some(previous) = previous {
            previous.lock().take();
        }
    }

    /// Schedule an invocation with `args`, superseding any pending one.
    ///
    /// The returned handle settles with the target's output if this call is
    /// the last one before the quiet period; otherwise it is abandoned as
    /// soon as the next call is made.
    pub fn call(&self, args: A) -> DebounceHandle<T> {
        let (tx, rx) = oneshot::channel();
        let sender: SenderCell<T> = Arc::new(Mutex::new(Some(tx)));
        self.supersede(Some(Arc::clone(&sender)));

        let func = Arc::clone(&self.func);
        let runtime = self.slot.runtime.clone();

        self.slot.arm(move || {
            // Empty when a later call won the race against this timer.
            let Some(tx) = sender.lock().take() else {
                tracing::trace!(target: targets::DEBOUNCE, "timer fired for a superseded call");
                return;
            };
            let invocation = func(args);
            // Detached from the timer task: a later call must not cancel a
            // started invocation.
            runtime.spawn(async move {
                let output = invocation.await;
                let _ = tx.send(output);
            });
        });

        DebounceHandle {
            state: HandleState::Waiting(rx),
        }
    }

    /// Drop the pending invocation, if any.
    ///
    /// The handle of the cancelled call becomes abandoned immediately.
    pub fn cancel(&self) -> bool {
        self.supersede(None);
        self.slot.cancel()
    }

    /// Whether an invocation is scheduled but has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }

    /// The configured quiet period.
    pub fn wait(&self) -> Duration {
        self.slot.wait
    }
}

impl<A, T> fmt::Debug for DebouncedAsync<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedAsync")
            .field("wait", &self.slot.wait)
            .finish_non_exhaustive()
    }
}

enum HandleState<T> {
    Waiting(oneshot::Receiver<T>),
    Ready(T),
    Taken,
    Abandoned,
}

/// The deferred result of a [`DebouncedAsync::call`].
///
/// Resolves to the target's output. A handle whose call was superseded never
/// resolves (see the [module docs](self)).
pub struct DebounceHandle<T> {
    state: HandleState<T>,
}

impl<T> DebounceHandle<T> {
    /// Check, without waiting, whether this handle will never settle.
    pub fn is_abandoned(&mut self) -> bool {
        if let HandleState::Waiting(rx) = &mut self.state {
            match rx.try_recv() {
                Ok(output) => self.state = HandleState::Ready(output),
                Err(oneshot::error::TryRecvError::Closed) => self.state = HandleState::Abandoned,
                Err(oneshot::error::TryRecvError::Empty) => {}
            }
        }
        matches!(self.state, HandleState::Abandoned)
    }
}

// The output is never pinned in place; it is moved out when ready.
impl<T> Unpin for DebounceHandle<T> {}

impl<T> Future for DebounceHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        match std::mem::replace(&mut this.state, HandleState::Taken) {
            HandleState::Ready(output) => Poll::Ready(output),
            HandleState::Waiting(mut rx) => match Pin::new(&mut rx).poll(cx) {
                Poll::Ready(Ok(output)) => Poll::Ready(output),
                Poll::Ready(Err(_)) => {
                    tracing::trace!(target: targets::DEBOUNCE, "awaited an abandoned handle");
                    this.state = HandleState::Abandoned;
                    Poll::Pending
                }
                Poll::Pending => {
                    this.state = HandleState::Waiting(rx);
                    Poll::Pending
                }
            },
            HandleState::Abandoned => {
                this.state = HandleState::Abandoned;
                Poll::Pending
            }
            HandleState::Taken => panic!("DebounceHandle polled after completion"),
        }
    }
}

impl<T> fmt::Debug for DebounceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            HandleState::Waiting(_) => "waiting",
            HandleState::Ready(_) => "ready",
            HandleState::Taken => "taken",
            HandleState::Abandoned => "abandoned",
        };
        f.debug_struct("DebounceHandle").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{Instant, advance, sleep};

    fn recorder() -> (Arc<Mutex<Vec<(String, Instant)>>>, Debounced<String>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = Arc::clone(&calls);
        let debounced = Debounced::new(
            move |term: String| calls_clone.lock().push((term, Instant::now())),
            DEFAULT_WAIT,
        );
        (calls, debounced)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_args() {
        let (calls, debounced) = recorder();
        let start = Instant::now();

        debounced.call("a".into());
        advance(Duration::from_millis(100)).await;
        debounced.call("al".into());
        advance(Duration::from_millis(20)).await;
        debounced.call("ali".into());
        assert!(debounced.is_pending());

        sleep(Duration::from_millis(400)).await;

        let calls = calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "ali");
        assert_eq!(calls[0].1 - start, Duration::from_millis(370));
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_fire_in_order() {
        let (calls, debounced) = recorder();

        for term in ["x", "y", "z"] {
            debounced.call(term.into());
            sleep(Duration::from_millis(300)).await;
        }

        let terms: Vec<String> = calls.lock().iter().map(|(t, _)| t.clone()).collect();
        assert_eq!(terms, vec!["x", "y", "z"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_invocation() {
        let (calls, debounced) = recorder();

        debounced.call("a".into());
        assert!(debounced.cancel());
        assert!(!debounced.cancel());
        sleep(Duration::from_millis(500)).await;

        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_instances_do_not_share_timers() {
        let (first_calls, first) = recorder();
        let (second_calls, second) = recorder();

        first.call("one".into());
        second.call("two".into());
        sleep(Duration::from_millis(300)).await;

        assert_eq!(first_calls.lock().len(), 1);
        assert_eq!(second_calls.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_last_handle_settles() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let invocations_clone = Arc::clone(&invocations);
        let debounced = DebouncedAsync::new(
            move |term: String| {
                let invocations = Arc::clone(&invocations_clone);
                async move {
                    invocations.fetch_add(1, Ordering::SeqCst);
                    term.to_uppercase()
                }
            },
            DEFAULT_WAIT,
        );

        let mut first = debounced.call("a".into());
        let last = debounced.call("al".into());

        assert_eq!(last.await, "AL");
        assert!(first.is_abandoned());
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_handle_is_abandoned_immediately() {
        let debounced = DebouncedAsync::new(|n: u32| async move { n }, DEFAULT_WAIT);

        let mut first = debounced.call(1);
        assert!(!first.is_abandoned());

        let mut second = debounced.call(2);
        assert!(first.is_abandoned());
        assert!(!second.is_abandoned());

        assert!(debounced.cancel());
        assert!(second.is_abandoned());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_handle_never_resolves() {
        let debounced = DebouncedAsync::new(|n: u32| async move { n }, DEFAULT_WAIT);

        let first = debounced.call(1);
        let _second = debounced.call(2);

        let waited = tokio::time::timeout(Duration::from_secs(5), first).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_failure_reaches_handle() {
        let debounced = DebouncedAsync::new(
            |n: u32| async move {
                if n == 0 {
                    Err("zero".to_string())
                } else {
                    Ok(n)
                }
            },
            DEFAULT_WAIT,
        );

        assert_eq!(debounced.call(0).await, Err("zero".to_string()));
        assert_eq!(debounced.call(3).await, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_call_does_not_cancel_started_invocation() {
        let debounced = DebouncedAsync::new(
            |n: u32| async move {
                sleep(Duration::from_millis(500)).await;
                n
            },
            DEFAULT_WAIT,
        );

        let first = debounced.call(1);
        // The first invocation is now running its slow body.
        sleep(Duration::from_millis(300)).await;
        let second = debounced.call(2);

        assert_eq!(first.await, 1);
        assert_eq!(second.await, 2);
    }
}
