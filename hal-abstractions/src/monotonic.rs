//! Monotonic millisecond counter

/// Free-running millisecond counter used for bounded waits.
///
/// Only differences between two readings are meaningful; the counter may
/// restart from zero across power cycles.
pub trait MonotonicMillis {
    fn now_millis(&self) -> u64;
}

impl<T: MonotonicMillis + ?Sized> MonotonicMillis for &T {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}
