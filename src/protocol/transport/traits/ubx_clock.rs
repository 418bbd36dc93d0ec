//! Monotonic time source used to evaluate step timeouts and phase ceilings.
use embassy_time::Instant;

/// Clock abstraction; the driver never reads time any other way.
pub trait UbxClock {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}
