//! Deterministic mock implementation of the shared `completion_provider` contract.
//!
//! This crate contains no transport logic and is intended for offline runs
//! and contract-level integration testing.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use completion_provider::{
    CompletionError, CompletionProvider, CompletionRequest, ProviderProfile,
};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

const MOCK_MODEL_ID: &str = "mock-debater";

/// Outcome returned by one scripted exchange.
pub type MockOutcome = Result<String, CompletionError>;

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<MockOutcome>,
    requests: Vec<CompletionRequest>,
}

/// Scripted provider: replays queued outcomes in order, then falls back to a
/// canned counter-argument that quotes the user's message.
#[derive(Debug)]
pub struct MockProvider {
    state: Mutex<MockState>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Creates a provider that replays `script` before using the canned reply.
    #[must_use]
    pub fn new(script: Vec<MockOutcome>) -> Self {
        Self {
            state: Mutex::new(MockState {
                script: script.into(),
                requests: Vec::new(),
            }),
            delay: None,
        }
    }

    /// Creates a provider whose first exchange succeeds with `reply`.
    #[must_use]
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::new(vec![Ok(reply.into())])
    }

    /// Creates a provider whose first exchange fails with `error`.
    #[must_use]
    pub fn failing(error: CompletionError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Sleeps for `delay` before resolving each exchange.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Appends an outcome to the end of the script.
    pub fn push_outcome(&self, outcome: MockOutcome) {
        lock_unpoisoned(&self.state).script.push_back(outcome);
    }

    /// Returns every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock_unpoisoned(&self.state).requests.clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        lock_unpoisoned(&self.state).requests.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(Vec::new()).with_delay(Duration::from_millis(400))
    }
}

impl CompletionProvider for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: MOCK_MODEL_ID.to_string(),
        }
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let scripted = {
            let mut state = lock_unpoisoned(&self.state);
            state.requests.push(request.clone());
            state.script.pop_front()
        };

        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        match scripted {
            Some(Ok(reply)) => Ok(reply.trim().to_string()),
            Some(Err(error)) => Err(error),
            None => Ok(canned_reply(&request.user_text)),
        }
    }
}

fn canned_reply(user_text: &str) -> String {
    let quoted: String = user_text.trim().chars().take(80).collect();
    format!(
        "You say \"{quoted}\", but consider the strongest objection: what evidence would change your mind?"
    )
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
