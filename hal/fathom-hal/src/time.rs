//! Monotonic time abstraction

/// Millisecond clock
///
/// Values are milliseconds since an arbitrary epoch and never decrease
/// (until the `u32` wraps, after ~49 days).
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
