//! Conversation module
//!
//! The multi-turn workflow that gathers a trip from free text. State lives in
//! the [`Session`] value handed back and forth with the caller; nothing is
//! stored server-side.

pub mod orchestrator;
pub mod parse;
pub mod session;

pub use orchestrator::Orchestrator;
pub use session::{Outcome, Reply, Session, Stage, StageKind, TripDraft, Turn};
