//! Shared in-flight request budget.
//!
//! The remote API's request quota is a shared resource: every provider
//! call — listing, snapshotting, content fetching — acquires a permit
//! from one limiter before going out, regardless of which worker issues
//! it. Permits are released on drop.

use std::sync::{Condvar, Mutex};

#[derive(Debug)]
pub struct RequestLimiter {
    permits: Mutex<usize>,
    available: Condvar,
}

impl RequestLimiter {
    /// A limiter with `max_in_flight` permits. A bound of zero is
    /// clamped to one so the limiter can never deadlock.
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            permits: Mutex::new(max_in_flight.max(1)),
            available: Condvar::new(),
        }
    }

    /// Blocks until a permit is free.
    pub fn acquire(&self) -> RequestPermit<'_> {
        let mut permits = self.permits.lock().unwrap_or_else(|e| e.into_inner());
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(|e| e.into_inner());
        }
        *permits -= 1;
        RequestPermit { limiter: self }
    }

    fn release(&self) {
        let mut permits = self.permits.lock().unwrap_or_else(|e| e.into_inner());
        *permits += 1;
        self.available.notify_one();
    }
}

/// RAII guard for one in-flight request slot.
pub struct RequestPermit<'a> {
    limiter: &'a RequestLimiter,
}

impl Drop for RequestPermit<'_> {
    fn drop(&mut self) {
        self.limiter.release();
    }
}
