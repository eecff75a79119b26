//! Core of the debate chat program: topic catalog, transcript, and the
//! conversation-turn controller.
//!
//! Invariant: a session's transcript holds at most one pending entry and it
//! is always last.
//!
//! # Public API Overview
//! - Pick a topic from [`catalog`] and start a [`ChatSession`] with it.
//! - Drive the session with [`ChatSession::submit`] and feed results back
//!   through [`ChatSession::on_turn_event`].
//! - Implement [`TurnHost`] to run exchanges off the controlling thread.

pub mod persona;
pub mod session;
pub mod topics;
pub mod transcript;

pub use crate::persona::{sanitize_persona, DEFAULT_PERSONA};
pub use crate::session::{
    ChatSession, RejectReason, SubmitOutcome, TurnEvent, TurnHost, TurnId, TurnState,
};
pub use crate::topics::{
    catalog, find_by_number, find_by_title, resolve_choice, DebateTopic, OPEN_ENDED_TITLE,
};
pub use crate::transcript::{Author, ChatEntry, History, Transcript, TranscriptError};

pub use completion_provider::{CompletionError, CompletionRequest};
