//! Configuration sequence pushed to the module once per link establishment.
//!
//! The plan is a flat, strictly ordered list of CFG commands. Each step is
//! gated on the reply described by its [`WaitPolicy`]; the cursor only moves
//! forward and the whole sequencer is rebuilt on link restart.
//!
//! ```text
//! 0       NAV5                       (group)
//! 1..=6   NMEA GGA GLL GSA GSV RMC VTG off      (group)
//! 7..=13  UBX NAV rates for the hardware tier   (group)
//! 14      RATE
//! 15      SBAS                       (group, reply optional)
//! 16      GNSS, generation >= 8 only (group, reply optional)
//! ```
use embassy_time::{Duration, Instant};

use crate::config::{DriverConfig, Provider, SbasMode};
use crate::core::{class, msg};
use crate::error::{NegotiationError, SendCommandError, SerializationError};
use crate::protocol::messages::{CfgGnss, CfgMsg, CfgNav5, CfgRate, CfgSbas, GnssBlock};
use crate::protocol::negotiation::ack_tracker::{AckState, AckTracker};
use crate::protocol::negotiation::capability::{Capabilities, HardwareGeneration};
use crate::protocol::negotiation::watchdog::PhaseWatchdog;
use crate::protocol::transport::traits::command_sender::CommandSender;
use crate::protocol::transport::traits::serial_port::SerialPort;
use crate::protocol::transport::{CFG_CMD_TIMEOUT_MS, SHORT_TIMEOUT_MS};

use core::task::Poll;

const NMEA_STEP: usize = 1;
const NMEA_LAST: usize = 6;
const TIER_STEP: usize = 7;
const TIER_LAST: usize = 13;
const RATE_STEP: usize = 14;
const SBAS_STEP: usize = 15;
const GNSS_STEP: usize = 16;

const DEFAULT_MEAS_RATE_MS: u16 = 200;
const FAST_MEAS_RATE_MS: u16 = 100;

/// Legacy text sentences switched off, in order.
const NMEA_SENTENCES: [u8; 6] = [
    msg::nmea::GGA,
    msg::nmea::GLL,
    msg::nmea::GSA,
    msg::nmea::GSV,
    msg::nmea::RMC,
    msg::nmea::VTG,
];

//==================================================================================WAIT_POLICY
/// Reply that lets a step complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPolicy {
    /// Positive acknowledgement only; a NAK stops the negotiation.
    Ack,
    /// Either reply; the module may legitimately refuse the command.
    AckOrNak,
    /// Either reply, or `CFG_CMD_TIMEOUT_MS` without one.
    AckOrNakOrTimeout,
}

//==================================================================================TIER
/// Message-rate table selected from the detected hardware generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigTier {
    /// Unknown, u-blox 5 and 6: every NAV message on periodic output.
    Legacy,
    /// u-blox 7 and 8.
    Mid,
    /// u-blox 9 and newer: NAV-PVT only.
    Modern,
}

impl ConfigTier {
    pub fn for_generation(generation: HardwareGeneration) -> Self {
        if generation >= HardwareGeneration::Ublox9 {
            ConfigTier::Modern
        } else if generation >= HardwareGeneration::Ublox7 {
            ConfigTier::Mid
        } else {
            ConfigTier::Legacy
        }
    }

    fn rates(self) -> &'static [RateEntry; 7] {
        match self {
            ConfigTier::Modern => &MODERN_RATES,
            ConfigTier::Mid => &MID_RATES,
            ConfigTier::Legacy => &LEGACY_RATES,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RateEntry {
    id: u8,
    rate: u8,
    policy: WaitPolicy,
}

const fn entry(id: u8, rate: u8) -> RateEntry {
    RateEntry {
        id,
        rate,
        policy: WaitPolicy::Ack,
    }
}

const MODERN_RATES: [RateEntry; 7] = [
    entry(msg::nav::POSLLH, 0),
    entry(msg::nav::STATUS, 0),
    entry(msg::nav::VELNED, 0),
    entry(msg::nav::TIMEUTC, 0),
    entry(msg::nav::PVT, 1),
    entry(msg::nav::SAT, 0),
    entry(msg::nav::SIG, 0),
];

const MID_RATES: [RateEntry; 7] = [
    entry(msg::nav::POSLLH, 0),
    entry(msg::nav::STATUS, 0),
    entry(msg::nav::SOL, 1),
    entry(msg::nav::VELNED, 0),
    entry(msg::nav::TIMEUTC, 0),
    entry(msg::nav::PVT, 1),
    entry(msg::nav::SVINFO, 0),
];

const LEGACY_RATES: [RateEntry; 7] = [
    entry(msg::nav::POSLLH, 1),
    entry(msg::nav::STATUS, 1),
    entry(msg::nav::SOL, 1),
    entry(msg::nav::VELNED, 1),
    entry(msg::nav::TIMEUTC, 10),
    // Older firmware does not know NAV-PVT and answers with a NAK.
    RateEntry {
        id: msg::nav::PVT,
        rate: 0,
        policy: WaitPolicy::AckOrNak,
    },
    entry(msg::nav::SVINFO, 0),
];

//==================================================================================COMMANDS
/// Constellations requested through CFG-GNSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GnssSelection {
    pub sbas: SbasMode,
    /// `Some(enabled)` when the module advertised Galileo.
    pub galileo: Option<bool>,
}

impl GnssSelection {
    pub fn to_command(&self) -> Result<CfgGnss, SerializationError> {
        let mut command = CfgGnss::new();
        command.push(GnssBlock::sbas(self.sbas))?;
        if let Some(enabled) = self.galileo {
            command.push(GnssBlock::galileo(enabled))?;
        }
        Ok(command)
    }
}

/// One command of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    Nav5(CfgNav5),
    Msg(CfgMsg),
    Rate(CfgRate),
    Sbas(CfgSbas),
    Gnss(GnssSelection),
}

impl ConfigCommand {
    /// Header of the CFG frame this command produces.
    pub fn class_id(&self) -> (u8, u8) {
        let id = match self {
            ConfigCommand::Nav5(_) => msg::cfg::NAV5,
            ConfigCommand::Msg(_) => msg::cfg::MSG,
            ConfigCommand::Rate(_) => msg::cfg::RATE,
            ConfigCommand::Sbas(_) => msg::cfg::SBAS,
            ConfigCommand::Gnss(_) => msg::cfg::GNSS,
        };
        (class::CFG, id)
    }

    fn send<S: SerialPort>(
        &self,
        port: &mut S,
        tracker: &mut AckTracker,
    ) -> Result<(), SendCommandError<S::Error>> {
        match self {
            ConfigCommand::Nav5(command) => port.send_command(command, tracker),
            ConfigCommand::Msg(command) => port.send_command(command, tracker),
            ConfigCommand::Rate(command) => port.send_command(command, tracker),
            ConfigCommand::Sbas(command) => port.send_command(command, tracker),
            ConfigCommand::Gnss(selection) => {
                let command = selection
                    .to_command()
                    .map_err(SendCommandError::Serialization)?;
                port.send_command(&command, tracker)
            }
        }
    }
}

/// A command with its completion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigStep {
    pub command: ConfigCommand,
    pub policy: WaitPolicy,
    /// The phase ceiling is re-armed before sending this step.
    pub opens_group: bool,
}

//==================================================================================PLAN
/// Ordered configuration plan derived from the settings and the detected
/// capabilities. Steps are produced on demand from the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigPlan {
    tier: ConfigTier,
    meas_rate_ms: u16,
    nav5: CfgNav5,
    sbas: CfgSbas,
    gnss: Option<GnssSelection>,
}

impl ConfigPlan {
    pub fn new(config: &DriverConfig, capabilities: &Capabilities) -> Self {
        let generation = capabilities.generation();
        let tier = ConfigTier::for_generation(generation);
        let meas_rate_ms = match (tier, config.provider) {
            (ConfigTier::Mid, Provider::Ublox7Plus) => FAST_MEAS_RATE_MS,
            _ => DEFAULT_MEAS_RATE_MS,
        };
        let gnss = (generation >= HardwareGeneration::Ublox8).then_some(GnssSelection {
            sbas: config.sbas_mode,
            galileo: capabilities.galileo().then_some(config.use_galileo),
        });

        Self {
            tier,
            meas_rate_ms,
            nav5: CfgNav5 {
                dynamic_model: config.dynamic_model,
                fix_mode: config.fix_mode,
            },
            sbas: CfgSbas {
                mode: config.sbas_mode,
            },
            gnss,
        }
    }

    pub fn tier(&self) -> ConfigTier {
        self.tier
    }

    pub fn meas_rate_ms(&self) -> u16 {
        self.meas_rate_ms
    }

    /// Number of steps in the plan.
    pub fn len(&self) -> usize {
        if self.gnss.is_some() {
            GNSS_STEP + 1
        } else {
            GNSS_STEP
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Step at `cursor`, `None` past the end.
    pub fn step(&self, cursor: usize) -> Option<ConfigStep> {
        let (command, policy) = match cursor {
            0 => (ConfigCommand::Nav5(self.nav5), WaitPolicy::Ack),
            NMEA_STEP..=NMEA_LAST => (
                ConfigCommand::Msg(CfgMsg {
                    msg_class: class::NMEA,
                    msg_id: NMEA_SENTENCES[cursor - NMEA_STEP],
                    rate: 0,
                }),
                WaitPolicy::Ack,
            ),
            TIER_STEP..=TIER_LAST => {
                let entry = self.tier.rates()[cursor - TIER_STEP];
                (
                    ConfigCommand::Msg(CfgMsg {
                        msg_class: class::NAV,
                        msg_id: entry.id,
                        rate: entry.rate,
                    }),
                    entry.policy,
                )
            }
            RATE_STEP => (
                ConfigCommand::Rate(CfgRate::new(self.meas_rate_ms)),
                WaitPolicy::Ack,
            ),
            SBAS_STEP => (ConfigCommand::Sbas(self.sbas), WaitPolicy::AckOrNakOrTimeout),
            GNSS_STEP => (
                ConfigCommand::Gnss(self.gnss?),
                WaitPolicy::AckOrNakOrTimeout,
            ),
            _ => return None,
        };

        Some(ConfigStep {
            command,
            policy,
            opens_group: matches!(cursor, 0 | NMEA_STEP | TIER_STEP | SBAS_STEP | GNSS_STEP),
        })
    }
}

//==================================================================================SEQUENCER
/// Drives a [`ConfigPlan`] one reply at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSequencer {
    plan: ConfigPlan,
    cursor: usize,
    sent_at: Option<Instant>,
}

impl ConfigSequencer {
    pub fn new(plan: ConfigPlan) -> Self {
        Self {
            plan,
            cursor: 0,
            sent_at: None,
        }
    }

    pub fn plan(&self) -> &ConfigPlan {
        &self.plan
    }

    /// Index of the step being sent or awaited.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.plan.len()
    }

    /// Advance as far as the replies received so far allow.
    ///
    /// # Errors
    ///
    /// - [`NegotiationError::Rejected`] when a step requiring an ACK is NAKed
    /// - [`NegotiationError::Send`] when a command cannot be encoded or written
    pub fn poll<S: SerialPort>(
        &mut self,
        port: &mut S,
        tracker: &mut AckTracker,
        watchdog: &mut PhaseWatchdog,
        now: Instant,
    ) -> Result<Poll<()>, NegotiationError<S::Error>> {
        loop {
            let Some(step) = self.plan.step(self.cursor) else {
                return Ok(Poll::Ready(()));
            };

            let Some(sent_at) = self.sent_at else {
                if step.opens_group {
                    watchdog.arm(now, SHORT_TIMEOUT_MS);
                }
                step.command.send(port, tracker)?;
                self.sent_at = Some(now);
                continue;
            };

            let complete = match (tracker.state(), step.policy) {
                (AckState::Acked, _) => true,
                (AckState::Nacked, WaitPolicy::Ack) => {
                    let (class, id) = step.command.class_id();
                    #[cfg(feature = "defmt")]
                    defmt::error!("Step {=usize} rejected", self.cursor);
                    return Err(NegotiationError::Rejected { class, id });
                }
                (AckState::Nacked, _) => true,
                (_, WaitPolicy::AckOrNakOrTimeout) => {
                    let timed_out = now
                        .checked_duration_since(sent_at)
                        .unwrap_or(Duration::from_ticks(0))
                        >= Duration::from_millis(CFG_CMD_TIMEOUT_MS);
                    if timed_out {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("Step {=usize} unanswered, continuing", self.cursor);
                    }
                    timed_out
                }
                _ => false,
            };

            if !complete {
                return Ok(Poll::Pending);
            }
            #[cfg(feature = "defmt")]
            defmt::debug!("Configuration step {=usize} complete", self.cursor);
            self.cursor += 1;
            self.sent_at = None;
        }
    }
}
