//! Ordered chat transcript for one debate session.
//!
//! Entries are append-only. The one exception is the trailing pending
//! placeholder, which is removed before the entry that resolves it is added.

use completion_provider::{ChatMessage, ChatRole};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Author {
    User,
    Assistant,
}

impl Author {
    #[must_use]
    pub fn role(self) -> ChatRole {
        match self {
            Self::User => ChatRole::User,
            Self::Assistant => ChatRole::Assistant,
        }
    }
}

/// One rendered line of conversation.
///
/// Equality is identity: two entries are equal only when their ids match.
#[derive(Debug, Clone)]
pub struct ChatEntry {
    id: Uuid,
    text: String,
    author: Author,
    pending: bool,
    is_error: bool,
}

impl PartialEq for ChatEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ChatEntry {}

impl ChatEntry {
    fn new(author: Author, text: String, pending: bool, is_error: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author,
            pending,
            is_error,
        }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text.into(), false, false)
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Author::Assistant, text.into(), false, false)
    }

    /// Assistant-authored entry describing a failed turn.
    #[must_use]
    pub fn assistant_error(text: impl Into<String>) -> Self {
        Self::new(Author::Assistant, text.into(), false, true)
    }

    /// Empty placeholder shown while a reply is outstanding.
    #[must_use]
    pub fn pending_reply() -> Self {
        Self::new(Author::Assistant, String::new(), true, false)
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn author(&self) -> Author {
        self.author
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("transcript invariant violated: {0}")]
    InvariantViolation(&'static str),
    #[error("transcript is empty")]
    EmptyTranscript,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry` at the end.
    ///
    /// Fails while the last entry is pending, and for non-pending entries
    /// with empty text.
    pub fn append(&mut self, entry: ChatEntry) -> Result<(), TranscriptError> {
        if self.last().is_some_and(ChatEntry::is_pending) {
            return Err(TranscriptError::InvariantViolation(
                "pending entry must be removed before appending",
            ));
        }

        if !entry.pending && entry.text.is_empty() {
            return Err(TranscriptError::InvariantViolation(
                "non-pending entry must carry text",
            ));
        }

        self.entries.push(entry);
        Ok(())
    }

    pub fn remove_last(&mut self) -> Result<ChatEntry, TranscriptError> {
        self.entries.pop().ok_or(TranscriptError::EmptyTranscript)
    }

    /// Chronological `(author, text)` pairs, pending entries skipped.
    #[must_use]
    pub fn history(&self) -> History<'_> {
        History {
            entries: self.entries.iter(),
        }
    }

    /// History mapped to provider messages.
    #[must_use]
    pub fn history_messages(&self) -> Vec<ChatMessage> {
        self.history()
            .map(|(author, text)| ChatMessage::new(author.role(), text))
            .collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.last().is_some_and(ChatEntry::is_pending)
    }
}

/// Restartable iterator returned by [`Transcript::history`].
#[derive(Debug, Clone)]
pub struct History<'a> {
    entries: std::slice::Iter<'a, ChatEntry>,
}

impl<'a> Iterator for History<'a> {
    type Item = (Author, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .find(|entry| !entry.pending)
            .map(|entry| (entry.author, entry.text.as_str()))
    }
}
