//! UBX transport layer: byte-stream frame decoder, command frame encoder and
//! the collaborator traits (serial port, clock, async timer).
//!
//! ## Protocol timing constants
//!
//! Values applied by the negotiation task. Every ceiling bounds a whole
//! phase; per-command step timeouts are checked independently.

pub mod decoder;
pub mod encoder;
pub mod traits;

/// Wait applied to a single configuration command or version poll (ms).
pub const CFG_CMD_TIMEOUT_MS: u64 = 200;

/// Number of MON-VER polls before falling back to an unknown generation.
pub const VERSION_RETRY_TIMES: u8 = 2;

/// Ceiling of each configuration group (ms).
pub const SHORT_TIMEOUT_MS: u64 = 500;

/// Ceiling of the version detection phase and of the running phase (ms).
///
/// While running, the ceiling is refreshed every time an epoch is consumed,
/// so it doubles as the "no solution received" link watchdog.
pub const LONG_TIMEOUT_MS: u64 = 1000;

/// Settle delay after each baud-change command (ms).
pub const BAUD_CHANGE_DELAY_MS: u64 = 100;

/// Ceiling of the auto-baud phase: one settle delay plus transmit slack per
/// candidate rate (ms).
pub const AUTO_BAUD_TIMEOUT_MS: u64 = (BAUD_CHANGE_DELAY_MS + 50) * 6;
