//! Asynchronous timer abstraction providing the tick period of the
//! cooperative runner.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait DriverTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}
