//! Link negotiation: everything the protocol task does before it starts
//! consuming navigation epochs.
//!
//! Phases run in order, each driven by repeated non-blocking `poll` calls
//! returning `Poll::Pending` until the awaited reply, timeout or transmit
//! condition is met:
//!
//! 1. [`baud::BaudNegotiator`] aligns the line speed.
//! 2. [`capability::VersionProbe`] identifies the hardware generation.
//! 3. [`sequencer::ConfigSequencer`] pushes the configuration plan.
//!
//! [`ack_tracker::AckTracker`] holds the reply to the last command and
//! [`watchdog::PhaseWatchdog`] bounds each phase.
pub mod ack_tracker;
pub mod baud;
pub mod capability;
pub mod sequencer;
pub mod watchdog;
