//! High-level components of the UBX protocol: transport (framing and
//! collaborator traits), typed messages, the navigation solution, link
//! negotiation and the polled driver tying them together.
pub mod driver;
pub mod messages;
pub mod navigation;
pub mod negotiation;
pub mod transport;
