//! Receiver capability detection from MON-VER reports, and the version
//! probe that polls for them.
use embassy_time::{Duration, Instant};

use crate::error::NegotiationError;
use crate::protocol::messages::mon::{until_nul, MonVer};
use crate::protocol::messages::MonVerPoll;
use crate::protocol::negotiation::ack_tracker::AckTracker;
use crate::protocol::transport::traits::command_sender::CommandSender;
use crate::protocol::transport::traits::serial_port::SerialPort;
use crate::protocol::transport::{CFG_CMD_TIMEOUT_MS, VERSION_RETRY_TIMES};

use core::task::Poll;

/// Index of the software version character gating the extension scan
/// (major digit of "ROM CORE x.yy").
const SW_VERSION_MAJOR_INDEX: usize = 9;
/// Minimum major digit (exclusive) of firmware able to report constellations.
const SW_VERSION_MAJOR_MIN: u8 = b'2';
/// Extension marker advertising Galileo support.
const GALILEO_MARKER: &[u8] = b"GAL";

//==================================================================================HARDWARE_GENERATION
/// Ordered hardware generations. `Unknown` sorts lowest so that every
/// branch on "at least generation N" treats it as the most conservative case.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareGeneration {
    #[default]
    Unknown,
    Ublox5,
    Ublox6,
    Ublox7,
    Ublox8,
    Ublox9,
    Ublox10,
}

/// Known `hwVersion` strings.
const HW_VERSION_TABLE: [(&[u8], HardwareGeneration); 6] = [
    (b"00040005", HardwareGeneration::Ublox5),
    (b"00040007", HardwareGeneration::Ublox6),
    (b"00070000", HardwareGeneration::Ublox7),
    (b"00080000", HardwareGeneration::Ublox8),
    (b"00190000", HardwareGeneration::Ublox9),
    (b"000A0000", HardwareGeneration::Ublox10),
];

impl HardwareGeneration {
    /// Exact match of a version slot (text up to its NUL terminator) against
    /// the known table. Prefixes and longer strings do not match.
    pub fn decode(hw_version: &[u8]) -> Self {
        let text = until_nul(hw_version);
        HW_VERSION_TABLE
            .iter()
            .find(|(known, _)| *known == text)
            .map(|&(_, generation)| generation)
            .unwrap_or(HardwareGeneration::Unknown)
    }
}

/// Scan the 30-byte extension slots for the Galileo marker. Each slot is
/// searched up to its NUL terminator.
pub fn scan_galileo(version: &MonVer<'_>) -> bool {
    version.extensions().any(|slot| {
        slot.windows(GALILEO_MARKER.len())
            .any(|window| window == GALILEO_MARKER)
    })
}

//==================================================================================CAPABILITIES
/// What the connected receiver is known to support. Reset on every link
/// restart, never downgraded in between.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    generation: HardwareGeneration,
    galileo: bool,
}

impl Capabilities {
    pub const fn new() -> Self {
        Self {
            generation: HardwareGeneration::Unknown,
            galileo: false,
        }
    }

    pub fn generation(&self) -> HardwareGeneration {
        self.generation
    }

    pub fn galileo(&self) -> bool {
        self.galileo
    }

    /// Update from a MON-VER report.
    pub fn on_version(&mut self, version: &MonVer<'_>) {
        let decoded = HardwareGeneration::decode(version.hw_version);
        if decoded > self.generation {
            #[cfg(feature = "defmt")]
            defmt::info!("Hardware generation detected: {}", decoded);
            self.generation = decoded;
        }

        if self.galileo || self.generation < HardwareGeneration::Ublox8 {
            return;
        }
        let major = version
            .sw_version
            .get(SW_VERSION_MAJOR_INDEX)
            .copied()
            .unwrap_or(0);
        if major > SW_VERSION_MAJOR_MIN && scan_galileo(version) {
            #[cfg(feature = "defmt")]
            defmt::info!("Galileo capability detected");
            self.galileo = true;
        }
    }
}

//==================================================================================VERSION_PROBE
/// Polls MON-VER until a known generation is reported, waiting
/// `CFG_CMD_TIMEOUT_MS` per attempt and giving up after
/// `VERSION_RETRY_TIMES` attempts. Giving up is not an error: the
/// configuration then takes the conservative branch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VersionProbe {
    attempts: u8,
    sent_at: Option<Instant>,
}

impl VersionProbe {
    pub const fn new() -> Self {
        Self {
            attempts: 0,
            sent_at: None,
        }
    }

    /// Number of polls sent so far.
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    pub fn poll<S: SerialPort>(
        &mut self,
        port: &mut S,
        tracker: &mut AckTracker,
        capabilities: &Capabilities,
        now: Instant,
    ) -> Result<Poll<()>, NegotiationError<S::Error>> {
        loop {
            let Some(sent_at) = self.sent_at else {
                port.send_command(&MonVerPoll, tracker)?;
                self.attempts += 1;
                self.sent_at = Some(now);
                continue;
            };

            if capabilities.generation() != HardwareGeneration::Unknown {
                return Ok(Poll::Ready(()));
            }

            let waited = now
                .checked_duration_since(sent_at)
                .unwrap_or(Duration::from_ticks(0));
            if waited < Duration::from_millis(CFG_CMD_TIMEOUT_MS) {
                return Ok(Poll::Pending);
            }

            if self.attempts >= VERSION_RETRY_TIMES {
                #[cfg(feature = "defmt")]
                defmt::warn!("No MON-VER answer, hardware generation unknown");
                return Ok(Poll::Ready(()));
            }
            self.sent_at = None;
        }
    }
}
