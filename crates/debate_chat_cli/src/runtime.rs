use std::io::{self, BufRead};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use completion_provider::{
    CompletionError, CompletionProvider, CompletionRequest, ProviderProfile,
};
use debate_chat::{TurnEvent, TurnHost, TurnId};

/// Everything the controlling thread reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Input(String),
    /// A line arrived that was not valid UTF-8 and was dropped.
    UnreadableInput,
    InputClosed,
    Turn(TurnEvent),
}

/// Runs each exchange on its own worker thread and posts the outcome back as
/// [`AppEvent::Turn`].
pub struct TurnRuntime {
    provider: Arc<dyn CompletionProvider>,
    events: Sender<AppEvent>,
    next_turn_id: AtomicU64,
    render_requested: bool,
}

impl TurnRuntime {
    pub fn new(provider: Arc<dyn CompletionProvider>, events: Sender<AppEvent>) -> Self {
        Self {
            provider,
            events,
            next_turn_id: AtomicU64::new(1),
            render_requested: false,
        }
    }

    pub fn profile(&self) -> ProviderProfile {
        self.provider.profile()
    }

    /// Returns and clears the pending render request.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }
}

impl TurnHost for TurnRuntime {
    fn start_turn(&mut self, request: CompletionRequest) -> Result<TurnId, String> {
        let turn_id = self.next_turn_id.fetch_add(1, Ordering::SeqCst);
        let provider = Arc::clone(&self.provider);
        let events = self.events.clone();

        thread::Builder::new()
            .name(format!("debate-chat-turn-{turn_id}"))
            .spawn(move || run_worker(turn_id, provider.as_ref(), &request, &events))
            .map_err(|error| format!("failed to spawn turn worker: {error}"))?;

        tracing::debug!(turn_id, "turn worker spawned");
        Ok(turn_id)
    }

    fn request_render(&mut self) {
        self.render_requested = true;
    }
}

fn run_worker(
    turn_id: TurnId,
    provider: &dyn CompletionProvider,
    request: &CompletionRequest,
    events: &Sender<AppEvent>,
) {
    let outcome = catch_unwind(AssertUnwindSafe(|| provider.complete(request)));

    let event = match outcome {
        Ok(Ok(text)) => TurnEvent::Replied { turn_id, text },
        Ok(Err(error)) => TurnEvent::Failed { turn_id, error },
        Err(_) => {
            tracing::error!(turn_id, "completion provider panicked");
            TurnEvent::Failed {
                turn_id,
                error: CompletionError::Transport("completion provider panicked".to_string()),
            }
        }
    };

    if events.send(AppEvent::Turn(event)).is_err() {
        tracing::debug!(turn_id, "event channel closed before turn resolved");
    }
}

/// Reads `reader` on its own thread, forwarding each line as
/// [`AppEvent::Input`] and finishing with [`AppEvent::InputClosed`].
pub fn spawn_input_reader<R>(reader: R, events: Sender<AppEvent>) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("debate-chat-input".to_string())
        .spawn(move || forward_input_lines(reader, &events))
}

/// Forwards lines until end of input or a read error. A line that is not
/// valid UTF-8 becomes [`AppEvent::UnreadableInput`] and reading goes on.
pub fn forward_input_lines<R: BufRead>(mut reader: R, events: &Sender<AppEvent>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let event = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => match decode_line(&buf) {
                Some(line) => AppEvent::Input(line),
                None => {
                    tracing::warn!(bytes = buf.len(), "dropping input line that is not UTF-8");
                    AppEvent::UnreadableInput
                }
            },
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => {
                tracing::warn!(%error, "input read failed");
                break;
            }
        };
        if events.send(event).is_err() {
            return;
        }
    }
    let _ = events.send(AppEvent::InputClosed);
}

fn decode_line(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw).ok().map(str::to_string)
}
