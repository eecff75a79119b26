//! Conversation-turn controller for one topic session.
//!
//! The controller owns the transcript and is driven from a single thread.
//! Each accepted submission hands one [`CompletionRequest`] to a
//! [`TurnHost`]; the host later reports back with a [`TurnEvent`] carrying
//! the same turn id.

use completion_provider::{CompletionError, CompletionRequest};

use crate::topics::DebateTopic;
use crate::transcript::{ChatEntry, Transcript, TranscriptError};

pub type TurnId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Submitting,
    AwaitingReply { turn_id: TurnId },
    Resolved,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyInput,
    TurnInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The exchange is in flight under this id.
    Started(TurnId),
    /// The host could not start the exchange; an error entry was appended.
    StartFailed,
    /// Nothing was appended and the state is unchanged.
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    Replied { turn_id: TurnId, text: String },
    Failed { turn_id: TurnId, error: CompletionError },
}

impl TurnEvent {
    #[must_use]
    pub fn turn_id(&self) -> TurnId {
        match self {
            Self::Replied { turn_id, .. } | Self::Failed { turn_id, .. } => *turn_id,
        }
    }
}

/// Capabilities the controller needs from its surrounding runtime.
pub trait TurnHost {
    /// Starts an exchange off the controlling thread and returns its id.
    fn start_turn(&mut self, request: CompletionRequest) -> Result<TurnId, String>;
    fn request_render(&mut self);
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    topic: DebateTopic,
    persona: String,
    transcript: Transcript,
    state: TurnState,
    input: String,
}

impl ChatSession {
    /// Starts a fresh session seeded with the topic's opening prompt.
    #[must_use]
    pub fn for_topic(topic: &DebateTopic, persona: impl Into<String>) -> Self {
        let mut session = Self {
            topic: *topic,
            persona: persona.into(),
            transcript: Transcript::new(),
            state: TurnState::Idle,
            input: String::new(),
        };

        let seeded = session
            .transcript
            .append(ChatEntry::assistant(topic.opening_prompt));
        session.check_sequencing(seeded);
        tracing::debug!(topic = topic.title, "session started");
        session
    }

    #[must_use]
    pub fn topic(&self) -> &DebateTopic {
        &self.topic
    }

    #[must_use]
    pub fn persona(&self) -> &str {
        &self.persona
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn state(&self) -> TurnState {
        self.state
    }

    #[must_use]
    pub fn awaiting_turn(&self) -> Option<TurnId> {
        match self.state {
            TurnState::AwaitingReply { turn_id } => Some(turn_id),
            _ => None,
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input buffer. Allowed in every state.
    pub fn on_input_replace(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submits the current input buffer.
    pub fn on_submit(&mut self, host: &mut dyn TurnHost) -> SubmitOutcome {
        let raw = self.input.clone();
        self.submit(&raw, host)
    }

    /// Submits `raw_input` as the next user turn.
    pub fn submit(&mut self, raw_input: &str, host: &mut dyn TurnHost) -> SubmitOutcome {
        if self.state != TurnState::Idle {
            tracing::debug!(state = ?self.state, "submit ignored while a turn is in flight");
            return SubmitOutcome::Rejected(RejectReason::TurnInFlight);
        }

        let text = raw_input.trim();
        if text.is_empty() {
            return SubmitOutcome::Rejected(RejectReason::EmptyInput);
        }

        self.transition(TurnState::Submitting);
        let history = self.transcript.history_messages();
        self.input.clear();

        let appended = self
            .transcript
            .append(ChatEntry::user(text))
            .and_then(|()| self.transcript.append(ChatEntry::pending_reply()));
        self.check_sequencing(appended);

        let request = CompletionRequest::new(self.persona.clone(), history, text);
        let outcome = match host.start_turn(request) {
            Ok(turn_id) => {
                self.transition(TurnState::AwaitingReply { turn_id });
                SubmitOutcome::Started(turn_id)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to start turn");
                self.settle(
                    ChatEntry::assistant_error(format!(
                        "I couldn't send your message ({error}). Try again."
                    )),
                    TurnState::Failed,
                );
                SubmitOutcome::StartFailed
            }
        };

        host.request_render();
        outcome
    }

    /// Applies a resolution event. Returns false when the event does not
    /// belong to the outstanding turn and was ignored.
    pub fn on_turn_event(&mut self, event: TurnEvent, host: &mut dyn TurnHost) -> bool {
        let turn_id = event.turn_id();
        if self.awaiting_turn() != Some(turn_id) {
            tracing::debug!(turn_id, state = ?self.state, "ignoring event for stale turn");
            return false;
        }

        match event {
            TurnEvent::Replied { text, .. } => {
                let text = text.trim();
                if text.is_empty() {
                    let error = CompletionError::MalformedResponse;
                    self.settle(
                        ChatEntry::assistant_error(error.user_message()),
                        TurnState::Failed,
                    );
                } else {
                    self.settle(ChatEntry::assistant(text), TurnState::Resolved);
                }
            }
            TurnEvent::Failed { error, .. } => {
                tracing::debug!(turn_id, %error, "turn failed");
                self.settle(
                    ChatEntry::assistant_error(error.user_message()),
                    TurnState::Failed,
                );
            }
        }

        host.request_render();
        true
    }

    fn settle(&mut self, entry: ChatEntry, via: TurnState) {
        let resolved = if self.transcript.has_pending() {
            self.transcript
                .remove_last()
                .and_then(|_| self.transcript.append(entry))
        } else {
            Err(TranscriptError::InvariantViolation(
                "resolution expected a trailing pending entry",
            ))
        };
        self.check_sequencing(resolved);

        self.transition(via);
        self.transition(TurnState::Idle);
    }

    fn transition(&mut self, next: TurnState) {
        tracing::debug!(from = ?self.state, to = ?next, "turn state transition");
        self.state = next;
    }

    fn check_sequencing(&self, result: Result<(), TranscriptError>) {
        debug_assert!(result.is_ok(), "transcript sequencing defect: {result:?}");
        if let Err(error) = result {
            tracing::error!(%error, topic = self.topic.title, "transcript sequencing defect");
        }
    }
}
