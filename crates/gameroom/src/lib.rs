//! Async runtime for live drafting sessions.
//!
//! This crate coordinates a multiplayer draft room: one coordinator task
//! owns the session state and serializes every mutation through a command
//! mailbox, so picks, timer expiries, and bot turns can never interleave.
//!
//! ## Architecture
//!
//! - [`Coordinator`] — Room actor owning the [`Session`] and its pick timer
//! - [`RoomHandle`] — Cloneable mailbox handle the transport layer talks to
//! - [`Session`] — Roster, configuration, and the active draft state
//! - [`Registry`] — Outbound channels plus the liveness probe for seat claims
//! - [`PickTimer`] — Deadline bookkeeping with per-pick shrinking allowances
//!
//! ## Messages
//!
//! - [`ClientMessage`] — Commands a connected participant may issue
//! - [`ServerMessage`] — Everything the room pushes back over the wire
//!
//! ## Advisory
//!
//! - [`Advisor`] — Coalescing front-end over a [`Scorer`] implementation
//! - [`HeuristicScorer`] / [`HttpScorer`] — Local and remote pick scoring
mod advisor;
mod config;
mod coordinator;
mod error;
mod log;
mod message;
mod participant;
mod registry;
mod session;
mod timer;

pub use advisor::*;
pub use config::*;
pub use coordinator::*;
pub use error::*;
pub use log::*;
pub use message::*;
pub use participant::*;
pub use registry::*;
pub use session::*;
pub use timer::*;
