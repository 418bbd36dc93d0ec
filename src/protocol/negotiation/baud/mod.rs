//! Line speed alignment.
//!
//! The module may be running at any of the supported speeds. In auto mode
//! the host switches its own UART through every candidate and sends the
//! baud-change sentence for the *target* speed at each one, without reading
//! anything back. The host then settles on the target speed.
use embassy_time::{Duration, Instant};

use crate::config::BaudRate;
use crate::error::NegotiationError;
use crate::protocol::transport::traits::serial_port::SerialPort;
use crate::protocol::transport::BAUD_CHANGE_DELAY_MS;

use core::task::Poll;

/// Position of the negotiator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudStep {
    /// Let pending output leave at the current speed.
    WaitTxIdle,
    /// Switch to candidate `index` and send the baud-change sentence.
    Probe { index: usize },
    /// Sentence queued at candidate `index`, waiting for the transmitter.
    Draining { index: usize },
    /// Sentence sent, giving the module time to apply it.
    Settling { index: usize, since: Instant },
    Done,
}

/// Fire-and-forget baud negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaudNegotiator {
    target: BaudRate,
    auto_baud: bool,
    step: BaudStep,
}

impl BaudNegotiator {
    pub const fn new(target: BaudRate, auto_baud: bool) -> Self {
        Self {
            target,
            auto_baud,
            step: BaudStep::WaitTxIdle,
        }
    }

    pub fn step(&self) -> BaudStep {
        self.step
    }

    pub fn poll<S: SerialPort>(
        &mut self,
        port: &mut S,
        now: Instant,
    ) -> Result<Poll<()>, NegotiationError<S::Error>> {
        loop {
            self.step = match self.step {
                BaudStep::WaitTxIdle => {
                    if !port.is_tx_empty() {
                        return Ok(Poll::Pending);
                    }
                    if self.auto_baud {
                        BaudStep::Probe { index: 0 }
                    } else {
                        self.finish(port)?
                    }
                }
                BaudStep::Probe { index } => match BaudRate::ALL.get(index) {
                    Some(&candidate) => {
                        #[cfg(feature = "defmt")]
                        defmt::debug!(
                            "Baud probe at {=u32} bps, asking for {=u32} bps",
                            candidate.bps(),
                            self.target.bps()
                        );
                        port.set_baud_rate(candidate)
                            .map_err(NegotiationError::Serial)?;
                        port.write(self.target.pubx_command().as_bytes())
                            .map_err(NegotiationError::Serial)?;
                        BaudStep::Draining { index }
                    }
                    None => self.finish(port)?,
                },
                BaudStep::Draining { index } => {
                    if !port.is_tx_empty() {
                        return Ok(Poll::Pending);
                    }
                    BaudStep::Settling { index, since: now }
                }
                BaudStep::Settling { index, since } => {
                    let waited = now
                        .checked_duration_since(since)
                        .unwrap_or(Duration::from_ticks(0));
                    if waited < Duration::from_millis(BAUD_CHANGE_DELAY_MS) {
                        return Ok(Poll::Pending);
                    }
                    BaudStep::Probe { index: index + 1 }
                }
                BaudStep::Done => return Ok(Poll::Ready(())),
            };
        }
    }

    fn finish<S: SerialPort>(&self, port: &mut S) -> Result<BaudStep, NegotiationError<S::Error>> {
        #[cfg(feature = "defmt")]
        defmt::info!("Serial link set to {=u32} bps", self.target.bps());
        port.set_baud_rate(self.target)
            .map_err(NegotiationError::Serial)?;
        Ok(BaudStep::Done)
    }
}
