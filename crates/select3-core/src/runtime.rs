//! Runtime management for async operations.
//!
//! Debounce timers and remote searches run on tokio. Code that is already
//! inside a runtime (an async host, `#[tokio::test]`) uses that runtime; a
//! synchronous host gets a lazily created global runtime instead.

use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};

use crate::logging::targets;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initialize the global fallback runtime.
///
/// This may be called early by a synchronous host. If not called explicitly,
/// the runtime is created on first use.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tracing::debug!(target: targets::RUNTIME, "creating global runtime");
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("select3-async")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Get a handle to the runtime new tasks should be spawned on.
///
/// Prefers the runtime the caller is currently running inside of.
pub fn handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| init().handle().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_outside_runtime_uses_global() {
        let handle = handle();
        assert_eq!(
            handle.runtime_flavor(),
            tokio::runtime::RuntimeFlavor::MultiThread
        );
        let value = init().block_on(handle.spawn(async { 21 * 2 }));
        assert_eq!(value.ok(), Some(42));
    }

    #[tokio::test]
    async fn test_handle_inside_runtime_uses_current() {
        // The global fallback is multi-threaded; the test runtime is not.
        assert_eq!(
            handle().runtime_flavor(),
            tokio::runtime::RuntimeFlavor::CurrentThread
        );
    }
}
