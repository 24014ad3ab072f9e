/// Millisecond time source used to enforce read deadlines.
///
/// Only differences between two readings are used, so any monotonic origin
/// (boot time, process start) works.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}
