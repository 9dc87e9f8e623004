//! Cooperative cancellation shared between the session and search workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation signal.
///
/// Clones observe the same flag: the session keeps one handle, the worker
/// running a search polls another.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Ask every holder to wind down at its next poll.
    #[inline]
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Re-arm before a new search.
    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Whether two handles refer to the same signal.
    #[must_use]
    pub fn shares_with(&self, other: &StopFlag) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn stop_and_reset() {
        let flag = StopFlag::new();
        assert!(!flag.is_stopped());
        flag.stop();
        assert!(flag.is_stopped());
        flag.reset();
        assert!(!flag.is_stopped());
    }

    #[test]
    fn clones_share_state_across_threads() {
        let flag = StopFlag::new();
        let worker = flag.clone();
        assert!(flag.shares_with(&worker));
        assert!(!flag.shares_with(&StopFlag::new()));

        let handle = thread::spawn(move || {
            while !worker.is_stopped() {
                thread::yield_now();
            }
        });
        flag.stop();
        handle.join().unwrap();
    }
}
