//! Chat module
//!
//! This module provides:
//! - `message`: Immutable chat message records
//! - `session`: Per-model chat session with the busy state machine

mod message;
mod session;

pub use message::{ChatMessage, MessageId, Sender};
pub use session::{BusyHandle, BusyState, ChatSession, SubmitOutcome};
