//! Phase ceiling: bounds the total time the protocol task may spend in one
//! phase, independently of per-step timeouts.
use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseWatchdog {
    /// `None` while the ceiling waits for its first `start`.
    armed_at: Option<Instant>,
    timeout: Duration,
}

impl Default for PhaseWatchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseWatchdog {
    /// Disarmed watchdog; never expires until armed or started.
    pub const fn new() -> Self {
        Self {
            armed_at: None,
            timeout: Duration::from_ticks(0),
        }
    }

    /// Restart the ceiling from `now`.
    pub fn arm(&mut self, now: Instant, timeout_ms: u64) {
        #[cfg(feature = "defmt")]
        defmt::trace!("Phase ceiling armed: {=u64} ms", timeout_ms);
        self.armed_at = Some(now);
        self.timeout = Duration::from_millis(timeout_ms);
    }

    /// Set the ceiling without starting it; the clock runs from the next
    /// `start`.
    pub fn defer(&mut self, timeout_ms: u64) {
        self.armed_at = None;
        self.timeout = Duration::from_millis(timeout_ms);
    }

    /// Start a deferred ceiling at `now`. No effect once running.
    pub fn start(&mut self, now: Instant) {
        if self.armed_at.is_none() {
            #[cfg(feature = "defmt")]
            defmt::trace!("Phase ceiling started: {=u64} ms", self.timeout.as_millis());
            self.armed_at = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis()
    }

    /// `true` once strictly more than the ceiling elapsed since arming.
    pub fn expired(&self, now: Instant) -> bool {
        let Some(armed_at) = self.armed_at else {
            return false;
        };
        now.checked_duration_since(armed_at)
            .unwrap_or(Duration::from_ticks(0))
            > self.timeout
    }
}
