//! Single outstanding command tracker.
//!
//! Only the last command sent is tracked; sending a new one abandons the
//! previous record. Replies are matched on the message id alone, the class
//! byte of the ACK payload is not compared. Two commands of different
//! classes sharing an id could therefore satisfy each other's wait; the
//! driver never has two such commands in flight, so the risk is accepted.
use crate::protocol::messages::{AckAck, AckNak};

/// Acknowledgement state of the tracked command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckState {
    /// Nothing sent since the last reset.
    #[default]
    Idle,
    Waiting,
    Acked,
    Nacked,
}

/// Tracks the reply to the last command sent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AckTracker {
    state: AckState,
    waiting_id: u8,
}

impl AckTracker {
    pub const fn new() -> Self {
        Self {
            state: AckState::Idle,
            waiting_id: 0,
        }
    }

    pub fn state(&self) -> AckState {
        self.state
    }

    /// Id of the command being waited on.
    pub fn waiting_id(&self) -> u8 {
        self.waiting_id
    }

    /// Start tracking a freshly sent command.
    pub fn begin(&mut self, id: u8) {
        self.state = AckState::Waiting;
        self.waiting_id = id;
    }

    pub fn on_ack(&mut self, ack: &AckAck) {
        if self.state == AckState::Waiting && ack.msg_id == self.waiting_id {
            #[cfg(feature = "defmt")]
            defmt::debug!("ACK for {=u8:#x}/{=u8:#x}", ack.cls_id, ack.msg_id);
            self.state = AckState::Acked;
        }
    }

    pub fn on_nak(&mut self, nak: &AckNak) {
        if self.state == AckState::Waiting && nak.msg_id == self.waiting_id {
            #[cfg(feature = "defmt")]
            defmt::warn!("NAK for {=u8:#x}/{=u8:#x}", nak.cls_id, nak.msg_id);
            self.state = AckState::Nacked;
        }
    }
}
