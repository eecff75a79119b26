use std::path::PathBuf;

use debate_chat::{ChatSession, RejectReason, SubmitOutcome, TurnEvent, TurnHost};
use settings_store::{Preferences, SecretStore, API_KEY_ENTRY};

use crate::commands::{parse_slash_command, SlashCommand};
use crate::runtime::AppEvent;

pub const HELP_TEXT: &str = "Commands: /help, /topics (pick another topic), /key <api key> (save the API key), /quit";
pub const DISCLAIMER_TEXT: &str = "Replies come from a hosted language model. They can be wrong, one-sided or invented; treat them as sparring, not as fact.";
const HINT_TURN_IN_FLIGHT: &str =
    "Still waiting for the previous reply. Your message is kept; press Enter to send it once the reply arrives.";
pub const HINT_UNREADABLE_INPUT: &str =
    "That line was not valid UTF-8 and was ignored. Please type it again.";

#[derive(Debug, Clone)]
pub enum Mode {
    ChoosingTopic,
    Chatting(ChatSession),
}

#[derive(Debug)]
pub struct App {
    mode: Mode,
    persona: String,
    settings_dir: Option<PathBuf>,
    notices: Vec<String>,
    session_generation: u64,
    quit_requested: bool,
    input_closed: bool,
    dirty: bool,
}

impl App {
    pub fn new(persona: impl Into<String>, settings_dir: Option<PathBuf>) -> Self {
        Self {
            mode: Mode::ChoosingTopic,
            persona: persona.into(),
            settings_dir,
            notices: Vec::new(),
            session_generation: 0,
            quit_requested: false,
            input_closed: false,
            dirty: true,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn session(&self) -> Option<&ChatSession> {
        match &self.mode {
            Mode::Chatting(session) => Some(session),
            Mode::ChoosingTopic => None,
        }
    }

    /// Bumped whenever a session starts or is abandoned.
    pub fn session_generation(&self) -> u64 {
        self.session_generation
    }

    /// True after `/quit`, or after input closed with no turn in flight.
    pub fn should_exit(&self) -> bool {
        let awaiting = self
            .session()
            .is_some_and(|session| session.awaiting_turn().is_some());
        self.quit_requested || (self.input_closed && !awaiting)
    }

    pub fn push_notice(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
        self.dirty = true;
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Returns and clears the "needs render" flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn on_event(&mut self, event: AppEvent, host: &mut dyn TurnHost) {
        match event {
            AppEvent::Input(line) => self.on_line(&line, host),
            AppEvent::UnreadableInput => self.push_notice(HINT_UNREADABLE_INPUT),
            AppEvent::InputClosed => {
                self.input_closed = true;
                self.dirty = true;
            }
            AppEvent::Turn(event) => self.on_turn_event(event, host),
        }
    }

    pub fn on_line(&mut self, line: &str, host: &mut dyn TurnHost) {
        if let Some(command) = parse_slash_command(line) {
            self.on_command(command);
            return;
        }

        if matches!(self.mode, Mode::ChoosingTopic) {
            self.choose_topic(line);
            return;
        }
        let Mode::Chatting(session) = &mut self.mode else {
            return;
        };

        if !line.trim().is_empty() {
            session.on_input_replace(line);
        }

        if let SubmitOutcome::Rejected(RejectReason::TurnInFlight) = session.on_submit(host) {
            self.push_notice(HINT_TURN_IN_FLIGHT);
        }
    }

    fn choose_topic(&mut self, line: &str) {
        let choice = line.trim();
        if choice.is_empty() {
            return;
        }

        match debate_chat::resolve_choice(choice) {
            Some(topic) => {
                tracing::info!(topic = topic.title, "topic selected");
                self.mode = Mode::Chatting(ChatSession::for_topic(topic, self.persona.clone()));
                self.session_generation += 1;
                self.dirty = true;
            }
            None => self.push_notice(format!(
                "No topic matches '{choice}'. Enter a number from the list or a topic title."
            )),
        }
    }

    fn on_turn_event(&mut self, event: TurnEvent, host: &mut dyn TurnHost) {
        match &mut self.mode {
            Mode::Chatting(session) => {
                session.on_turn_event(event, host);
            }
            Mode::ChoosingTopic => {
                tracing::debug!(turn_id = event.turn_id(), "dropping result for abandoned session");
            }
        }
    }

    fn on_command(&mut self, command: SlashCommand) {
        match command {
            SlashCommand::Help => self.push_notice(HELP_TEXT),
            SlashCommand::Topics => {
                if let Mode::Chatting(session) = &self.mode {
                    tracing::info!(topic = session.topic().title, "session abandoned");
                }
                self.mode = Mode::ChoosingTopic;
                self.session_generation += 1;
                self.dirty = true;
            }
            SlashCommand::Key(value) => self.store_api_key(&value),
            SlashCommand::Quit => {
                self.quit_requested = true;
                self.dirty = true;
            }
            SlashCommand::Unknown(command) => {
                self.push_notice(format!("Unknown command: {command}. {HELP_TEXT}"));
            }
        }
    }

    fn store_api_key(&mut self, value: &str) {
        if value.trim().is_empty() {
            self.push_notice("Usage: /key <api key>");
            return;
        }

        let Some(dir) = self.settings_dir.clone() else {
            self.push_notice(
                "No settings directory is available; set DEBATE_CHAT_HOME or DEBATE_CHAT_API_KEY instead.",
            );
            return;
        };

        let stored = SecretStore::open(&dir).and_then(|mut store| store.set(API_KEY_ENTRY, value));
        match stored {
            Ok(()) => self.push_notice("API key saved. It will be used from the next message on."),
            Err(error) => {
                tracing::warn!(%error, "failed to store API key");
                self.push_notice(format!("Could not save the API key: {error}"));
            }
        }
    }
}

/// Returns the disclaimer on first launch and records that it was shown.
pub fn disclaimer_once(preferences: &mut Preferences) -> Option<&'static str> {
    if preferences.has_shown_disclaimer() {
        return None;
    }

    if let Err(error) = preferences.mark_disclaimer_shown() {
        tracing::warn!(%error, "failed to persist disclaimer flag");
    }

    Some(DISCLAIMER_TEXT)
}
