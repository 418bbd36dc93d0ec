//! Per-link state of the two cooperative tasks.
//!
//! A [`Session`] is created on driver start and replaced wholesale on every
//! link restart, so nothing negotiated with a previous module instance
//! survives.
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;

use crate::config::DriverConfig;
use crate::error::LinkError;
use crate::protocol::messages::UbxMessage;
use crate::protocol::navigation::{EpochStatus, NavSolution, SolutionMapper};
use crate::protocol::negotiation::ack_tracker::AckTracker;
use crate::protocol::negotiation::baud::BaudNegotiator;
use crate::protocol::negotiation::capability::{Capabilities, VersionProbe};
use crate::protocol::negotiation::sequencer::{ConfigPlan, ConfigSequencer};
use crate::protocol::negotiation::watchdog::PhaseWatchdog;
use crate::protocol::transport::decoder::{DecodeResult, DecoderStats, FrameDecoder, FrameRef};
use crate::protocol::transport::traits::serial_port::SerialPort;
use crate::protocol::transport::{AUTO_BAUD_TIMEOUT_MS, LONG_TIMEOUT_MS};

/// Protocol task phase, as reported to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkPhase {
    Baud,
    VersionDetection,
    Configuration,
    Running,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Baud(BaudNegotiator),
    Version(VersionProbe),
    Configure(ConfigSequencer),
    Running,
}

/// Decoder, mapper, negotiation state and the epoch-ready signal.
pub struct Session {
    decoder: FrameDecoder,
    mapper: SolutionMapper,
    tracker: AckTracker,
    capabilities: Capabilities,
    phase: Phase,
    watchdog: PhaseWatchdog,
    /// Single-slot: a second epoch before consumption overwrites the first.
    epoch_ready: Signal<NoopRawMutex, NavSolution>,
}

impl Session {
    /// Fresh session in the baud phase. Its ceiling starts on the first
    /// protocol tick, not at construction.
    pub fn new(config: &DriverConfig) -> Self {
        let mut watchdog = PhaseWatchdog::new();
        watchdog.defer(if config.auto_baud {
            AUTO_BAUD_TIMEOUT_MS
        } else {
            LONG_TIMEOUT_MS
        });

        Self {
            decoder: FrameDecoder::new(),
            mapper: SolutionMapper::new(),
            tracker: AckTracker::new(),
            capabilities: Capabilities::new(),
            phase: Phase::Baud(BaudNegotiator::new(config.baud_rate, config.auto_baud)),
            watchdog,
            epoch_ready: Signal::new(),
        }
    }

    pub fn phase(&self) -> LinkPhase {
        match self.phase {
            Phase::Baud(_) => LinkPhase::Baud,
            Phase::Version(_) => LinkPhase::VersionDetection,
            Phase::Configure(_) => LinkPhase::Configuration,
            Phase::Running => LinkPhase::Running,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn decoder_stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    pub fn tracker(&self) -> &AckTracker {
        &self.tracker
    }

    //==================================================================================RECEIVER_TASK
    /// Drain every byte currently waiting, dispatching complete frames.
    pub fn receive<S: SerialPort>(&mut self, port: &mut S) -> Result<(), LinkError<S::Error>> {
        while port.bytes_waiting() > 0 {
            let byte = port.read_byte().map_err(LinkError::Receive)?;
            if let DecodeResult::Frame(frame) = self.decoder.feed(byte) {
                dispatch(
                    frame,
                    &mut self.mapper,
                    &mut self.tracker,
                    &mut self.capabilities,
                    &self.epoch_ready,
                );
            }
        }
        Ok(())
    }

    //==================================================================================PROTOCOL_TASK
    /// Advance the negotiation, or consume the pending epoch once running.
    ///
    /// Returns the solution consumed during this call, if any.
    pub fn run_protocol<S: SerialPort>(
        &mut self,
        port: &mut S,
        config: &DriverConfig,
        now: Instant,
    ) -> Result<Option<NavSolution>, LinkError<S::Error>> {
        self.watchdog.start(now);
        let consumed = self.advance(port, config, now)?;

        if self.watchdog.expired(now) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Phase {} exceeded its ceiling", self.phase());
            return Err(LinkError::WatchdogExpired {
                timeout_ms: self.watchdog.timeout_ms(),
            });
        }
        Ok(consumed)
    }

    fn advance<S: SerialPort>(
        &mut self,
        port: &mut S,
        config: &DriverConfig,
        now: Instant,
    ) -> Result<Option<NavSolution>, LinkError<S::Error>> {
        loop {
            match &mut self.phase {
                Phase::Baud(negotiator) => {
                    if negotiator.poll(port, now)?.is_pending() {
                        return Ok(None);
                    }
                    if config.auto_config {
                        self.enter(Phase::Version(VersionProbe::new()), now);
                    } else {
                        self.enter(Phase::Running, now);
                    }
                }
                Phase::Version(probe) => {
                    if probe
                        .poll(port, &mut self.tracker, &self.capabilities, now)?
                        .is_pending()
                    {
                        return Ok(None);
                    }
                    let plan = ConfigPlan::new(config, &self.capabilities);
                    self.enter(Phase::Configure(ConfigSequencer::new(plan)), now);
                }
                Phase::Configure(sequencer) => {
                    if sequencer
                        .poll(port, &mut self.tracker, &mut self.watchdog, now)?
                        .is_pending()
                    {
                        return Ok(None);
                    }
                    self.enter(Phase::Running, now);
                }
                Phase::Running => {
                    let consumed = self.epoch_ready.try_take();
                    if consumed.is_some() {
                        self.watchdog.arm(now, LONG_TIMEOUT_MS);
                    }
                    return Ok(consumed);
                }
            }
        }
    }

    fn enter(&mut self, phase: Phase, now: Instant) {
        self.phase = phase;
        #[cfg(feature = "defmt")]
        defmt::info!("Entering phase {}", self.phase());
        match self.phase {
            // Configuration groups arm their own ceilings.
            Phase::Configure(_) => {}
            _ => self.watchdog.arm(now, LONG_TIMEOUT_MS),
        }
        // Drop any epoch completed while negotiating.
        self.epoch_ready.reset();
    }
}

/// Route a verified frame: version reports to the capability detector,
/// replies to the ack tracker, then everything through the mapper.
fn dispatch(
    frame: FrameRef<'_>,
    mapper: &mut SolutionMapper,
    tracker: &mut AckTracker,
    capabilities: &mut Capabilities,
    epoch_ready: &Signal<NoopRawMutex, NavSolution>,
) {
    let message = match UbxMessage::parse(frame.class, frame.id, frame.payload) {
        Ok(message) => message,
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Ignoring frame: {}", _err);
            return;
        }
    };

    match &message {
        UbxMessage::MonVer(version) => capabilities.on_version(version),
        UbxMessage::AckAck(ack) => tracker.on_ack(ack),
        UbxMessage::AckNak(nak) => tracker.on_nak(nak),
        _ => {}
    }

    if let EpochStatus::Complete(solution) = mapper.apply(&message) {
        epoch_ready.signal(solution);
    }
}
