//! Polled UBX driver.
//!
//! Each call to [`UbxDriver::poll`] is one scheduler tick:
//!
//! 1. the receiver task drains the serial input through the frame decoder
//!    and raises the epoch-ready signal on every completed epoch;
//! 2. the protocol task advances the baud/version/configuration phases, or
//!    once running, consumes the signal and publishes the solution.
//!
//! Neither task blocks. When either one fails (transport error, rejected
//! command, phase ceiling exceeded) the tick reports
//! [`LinkStatus::CommunicationLost`] and the whole session restarts from
//! the baud phase.
pub mod runner;
pub mod session;

use crate::config::DriverConfig;
use crate::error::LinkError;
use crate::protocol::navigation::NavSolution;
use crate::protocol::negotiation::capability::Capabilities;
use crate::protocol::transport::traits::serial_port::SerialPort;
use crate::protocol::transport::traits::ubx_clock::UbxClock;

pub use session::LinkPhase;
use session::Session;

/// Link health reported by every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Baud, version detection or configuration in progress.
    Negotiating,
    /// Configuration done, solutions are being consumed.
    Running,
    /// A task terminated during this tick; the session was restarted.
    CommunicationLost,
}

/// Lifetime counters. Decoder counters survive link restarts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverStats {
    /// Frames with a valid checksum.
    pub packets: u32,
    /// Framing errors recovered by the decoder.
    pub errors: u32,
    /// Solutions published to the application.
    pub epochs: u32,
    /// Sessions restarted after a communication loss.
    pub restarts: u32,
}

/// u-blox receiver driver over a non-blocking serial port.
pub struct UbxDriver<S: SerialPort, C: UbxClock> {
    port: S,
    clock: C,
    config: DriverConfig,
    session: Session,
    solution: Option<NavSolution>,
    stats: DriverStats,
}

impl<S: SerialPort, C: UbxClock> UbxDriver<S, C> {
    /// Start a session; nothing is sent and no ceiling runs before the
    /// first `poll`.
    pub fn new(port: S, clock: C, config: DriverConfig) -> Self {
        let session = Session::new(&config);
        Self {
            port,
            clock,
            config,
            session,
            solution: None,
            stats: DriverStats::default(),
        }
    }

    /// Run one tick of the receiver and protocol tasks.
    pub fn poll(&mut self) -> LinkStatus {
        let now = self.clock.now();
        match self.tick(now) {
            Ok(published) => {
                if let Some(solution) = published {
                    self.solution = Some(solution);
                    self.stats.epochs = self.stats.epochs.wrapping_add(1);
                }
                if self.session.phase() == LinkPhase::Running {
                    LinkStatus::Running
                } else {
                    LinkStatus::Negotiating
                }
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Communication lost: {}", defmt::Debug2Format(&_err));
                self.restart();
                LinkStatus::CommunicationLost
            }
        }
    }

    fn tick(
        &mut self,
        now: embassy_time::Instant,
    ) -> Result<Option<NavSolution>, LinkError<S::Error>> {
        self.session.receive(&mut self.port)?;
        self.session.run_protocol(&mut self.port, &self.config, now)
    }

    fn restart(&mut self) {
        let retired = self.session.decoder_stats();
        self.stats.packets = self.stats.packets.wrapping_add(retired.packets);
        self.stats.errors = self.stats.errors.wrapping_add(retired.errors);
        self.stats.restarts = self.stats.restarts.wrapping_add(1);
        self.session = Session::new(&self.config);
    }

    /// Last published solution. Kept across restarts; check the link status
    /// to know whether it is still fresh.
    pub fn solution(&self) -> Option<&NavSolution> {
        self.solution.as_ref()
    }

    pub fn phase(&self) -> LinkPhase {
        self.session.phase()
    }

    /// Capabilities detected in the current session.
    pub fn capabilities(&self) -> Capabilities {
        self.session.capabilities()
    }

    pub fn stats(&self) -> DriverStats {
        let live = self.session.decoder_stats();
        DriverStats {
            packets: self.stats.packets.wrapping_add(live.packets),
            errors: self.stats.errors.wrapping_add(live.errors),
            ..self.stats
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn port(&self) -> &S {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut S {
        &mut self.port
    }

    /// Give back the transport and the clock.
    pub fn release(self) -> (S, C) {
        (self.port, self.clock)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
