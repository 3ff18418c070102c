//! Live duels.
//!
//! - `duel`: the per-match state machine
//! - `messages`: JSON shapes exchanged with viewers
//! - `service`: load/modify/store/broadcast driver

pub mod duel;
pub mod messages;
pub mod service;

pub use duel::{DuelSession, JoinOutcome, MoveOutcome};
pub use messages::{BoardSnapshot, InboundCommand, MovePayload, OutboundMessage, SessionSnapshot};
pub use service::DuelService;
