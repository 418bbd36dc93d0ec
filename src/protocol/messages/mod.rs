//! Typed UBX messages: decoders for the frames the driver consumes and
//! encoders for the commands it sends.
//!
//! Incoming frames are turned into a single tagged [`UbxMessage`], keyed on
//! `(class, id)`. Frames the driver does not use come back as
//! [`UbxMessage::Other`] and are ignored by the dispatcher.
pub mod ack;
pub mod cfg;
pub mod mon;
pub mod nav;

use crate::core::{class, msg};
use crate::error::DeserializationError;
use crate::infra::codec::traits::FromPayload;

pub use ack::{AckAck, AckNak};
pub use cfg::{CfgGnss, CfgMsg, CfgNav5, CfgRate, CfgSbas, GnssBlock};
pub use mon::{MonVer, MonVerPoll};
pub use nav::{NavPosLlh, NavPvt, NavSol, NavStatus, NavTimeUtc, NavVelNed, UtcDateTime};

/// Decoded view of a verified frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UbxMessage<'a> {
    NavPosLlh(NavPosLlh),
    NavStatus(NavStatus),
    NavSol(NavSol),
    NavVelNed(NavVelNed),
    NavTimeUtc(NavTimeUtc),
    NavPvt(NavPvt),
    MonVer(MonVer<'a>),
    AckAck(AckAck),
    AckNak(AckNak),
    /// Any `(class, id)` the driver does not interpret.
    Other { class: u8, id: u8 },
}

impl<'a> UbxMessage<'a> {
    /// Decode a payload according to its frame header.
    ///
    /// Fails only when a known message is shorter than its layout.
    pub fn parse(class: u8, id: u8, payload: &'a [u8]) -> Result<Self, DeserializationError> {
        let message = match (class, id) {
            (class::NAV, msg::nav::POSLLH) => Self::NavPosLlh(NavPosLlh::from_payload(payload)?),
            (class::NAV, msg::nav::STATUS) => Self::NavStatus(NavStatus::from_payload(payload)?),
            (class::NAV, msg::nav::SOL) => Self::NavSol(NavSol::from_payload(payload)?),
            (class::NAV, msg::nav::VELNED) => Self::NavVelNed(NavVelNed::from_payload(payload)?),
            (class::NAV, msg::nav::TIMEUTC) => {
                Self::NavTimeUtc(NavTimeUtc::from_payload(payload)?)
            }
            (class::NAV, msg::nav::PVT) => Self::NavPvt(NavPvt::from_payload(payload)?),
            (class::MON, msg::mon::VER) => Self::MonVer(MonVer::from_payload(payload)?),
            (class::ACK, msg::ack::ACK) => Self::AckAck(AckAck::from_payload(payload)?),
            (class::ACK, msg::ack::NAK) => Self::AckNak(AckNak::from_payload(payload)?),
            _ => Self::Other { class, id },
        };
        Ok(message)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
