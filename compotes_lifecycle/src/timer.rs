// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-clocked timers.
//!
//! Nothing here reads a clock. The host passes a monotonic timestamp in
//! milliseconds to each call (the same convention as pointer timestamps), and
//! polls from its event loop through a widget's `tick(now)`.
//!
//! ```
//! use compotes_lifecycle::timer::Debounce;
//!
//! let mut resize = Debounce::new(100);
//! assert!(resize.call(0), "first call runs immediately");
//! assert!(!resize.call(10));
//! assert!(!resize.call(50), "bursts are coalesced");
//! assert!(!resize.poll(120));
//! assert!(resize.poll(150), "trailing call is due 100ms after the last one");
//! assert!(!resize.poll(500));
//! ```

/// Coalesces bursts of calls into one trailing call.
///
/// The very first call is flushed immediately so the initial observation is not
/// delayed. Later calls push a deadline `delay` milliseconds ahead; [`Debounce::poll`]
/// reports once when that deadline passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debounce {
    delay: u64,
    flushed_first: bool,
    deadline: Option<u64>,
}

impl Debounce {
    /// Default delay used by observer callbacks.
    pub const DEFAULT_DELAY: u64 = 100;

    /// Create a debouncer with `delay` milliseconds of quiet time.
    pub const fn new(delay: u64) -> Self {
        Self {
            delay,
            flushed_first: false,
            deadline: None,
        }
    }

    /// Signal a call at `now`. Returns `true` when the callback should run immediately.
    pub fn call(&mut self, now: u64) -> bool {
        if !self.flushed_first {
            self.flushed_first = true;
            return true;
        }
        self.deadline = Some(now.saturating_add(self.delay));
        false
    }

    /// Returns `true` once when the trailing call is due.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a trailing call is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any pending call. The next call is flushed immediately again.
    pub fn reset(&mut self) {
        self.flushed_first = false;
        self.deadline = None;
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

/// A single cancellable deadline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<u64>,
}

impl Timeout {
    /// An unarmed timeout.
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the timeout to fire `delay` milliseconds after `now`.
    pub fn arm(&mut self, now: u64, delay: u64) {
        self.deadline = Some(now.saturating_add(delay));
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether the timeout is armed.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once when the deadline has passed, disarming the timeout.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_restarts_after_reset() {
        let mut d = Debounce::new(100);
        assert!(d.call(0));
        assert!(!d.call(5));
        assert!(d.is_pending());
        d.reset();
        assert!(!d.is_pending());
        assert!(!d.poll(1_000));
        assert!(d.call(1_000), "first call after reset is flushed");
    }

    #[test]
    fn timeout_fires_once() {
        let mut t = Timeout::new();
        assert!(!t.poll(0));
        t.arm(10, 300);
        assert!(t.is_armed());
        assert!(!t.poll(309));
        assert!(t.poll(310));
        assert!(!t.poll(400));
        t.arm(400, 0);
        t.cancel();
        assert!(!t.poll(400));
    }
}
