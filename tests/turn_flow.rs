use completion_provider::{CompletionError, CompletionProvider, CompletionRequest};
use completion_provider_mock::MockProvider;
use debate_chat::{
    find_by_title, Author, ChatSession, RejectReason, SubmitOutcome, TurnEvent, TurnHost, TurnId,
    TurnState, OPEN_ENDED_TITLE,
};
use pretty_assertions::assert_eq;

/// Host that queues exchanges and runs them against a mock provider on demand.
struct QueueHost {
    provider: MockProvider,
    next_turn_id: TurnId,
    queued: Vec<(TurnId, CompletionRequest)>,
    render_requests: usize,
}

impl QueueHost {
    fn new(provider: MockProvider) -> Self {
        Self {
            provider,
            next_turn_id: 0,
            queued: Vec::new(),
            render_requests: 0,
        }
    }

    fn resolve_all(&mut self, session: &mut ChatSession) {
        for (turn_id, request) in std::mem::take(&mut self.queued) {
            let event = match self.provider.complete(&request) {
                Ok(text) => TurnEvent::Replied { turn_id, text },
                Err(error) => TurnEvent::Failed { turn_id, error },
            };
            session.on_turn_event(event, self);
        }
    }
}

impl TurnHost for QueueHost {
    fn start_turn(&mut self, request: CompletionRequest) -> Result<TurnId, String> {
        self.next_turn_id += 1;
        self.queued.push((self.next_turn_id, request));
        Ok(self.next_turn_id)
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }
}

fn open_ended_session() -> ChatSession {
    let topic = find_by_title(OPEN_ENDED_TITLE).expect("catalog has open-ended topic");
    ChatSession::for_topic(topic, "You are a debater.")
}

fn snapshot(session: &ChatSession) -> Vec<(Author, String, bool)> {
    session
        .transcript()
        .entries()
        .iter()
        .map(|entry| (entry.author(), entry.text().to_string(), entry.is_pending()))
        .collect()
}

#[test]
fn open_ended_topic_seeds_opening_prompt_and_hello_gets_reply() {
    let mut session = open_ended_session();
    let opening = session.topic().opening_prompt.to_string();
    assert_eq!(
        snapshot(&session),
        vec![(Author::Assistant, opening.clone(), false)]
    );

    let mut host = QueueHost::new(MockProvider::replying("Hi there"));
    assert_eq!(session.submit("Hello", &mut host), SubmitOutcome::Started(1));
    host.resolve_all(&mut session);

    assert_eq!(
        snapshot(&session),
        vec![
            (Author::Assistant, opening, false),
            (Author::User, "Hello".to_string(), false),
            (Author::Assistant, "Hi there".to_string(), false),
        ]
    );
    assert_eq!(session.state(), TurnState::Idle);
}

#[test]
fn each_resolved_turn_grows_transcript_by_two() {
    let mut session = open_ended_session();
    let mut host = QueueHost::new(MockProvider::new(Vec::new()));

    for (turn, input) in ["  first  ", "second", "third\n"].into_iter().enumerate() {
        let before = session.transcript().len();
        session.submit(input, &mut host);
        host.resolve_all(&mut session);

        assert_eq!(session.transcript().len(), before + 2, "turn {turn}");
        assert!(!session.transcript().has_pending());
        assert_eq!(session.state(), TurnState::Idle);
    }
}

#[test]
fn empty_and_whitespace_submissions_change_nothing() {
    let mut session = open_ended_session();
    let mut host = QueueHost::new(MockProvider::new(Vec::new()));

    for raw in ["", "   ", "\n\t "] {
        assert_eq!(
            session.submit(raw, &mut host),
            SubmitOutcome::Rejected(RejectReason::EmptyInput)
        );
    }

    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.state(), TurnState::Idle);
    assert!(host.queued.is_empty());
}

#[test]
fn second_submit_while_awaiting_is_a_no_op() {
    let mut session = open_ended_session();
    let mut host = QueueHost::new(MockProvider::replying("reply"));
    session.submit("first", &mut host);
    let during = snapshot(&session);

    assert_eq!(
        session.submit("second", &mut host),
        SubmitOutcome::Rejected(RejectReason::TurnInFlight)
    );
    assert_eq!(snapshot(&session), during);
    assert_eq!(host.queued.len(), 1);

    host.resolve_all(&mut session);
    assert_eq!(session.transcript().len(), 3);
}

#[test]
fn history_never_yields_pending_entries() {
    let mut session = open_ended_session();
    let mut host = QueueHost::new(MockProvider::replying("reply"));
    session.submit("Hello", &mut host);

    assert!(session.transcript().has_pending());
    let history: Vec<_> = session.transcript().history().collect();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|(_, text)| !text.is_empty()));

    host.resolve_all(&mut session);
    assert_eq!(session.transcript().history().count(), 3);
}

#[test]
fn transport_failure_leaves_error_entry_and_idle_controller() {
    let mut session = open_ended_session();
    let mut host = QueueHost::new(MockProvider::failing(CompletionError::Transport(
        "connection reset by peer".to_string(),
    )));

    session.submit("Hello", &mut host);
    host.resolve_all(&mut session);

    let last = session.transcript().last().expect("last entry");
    assert_eq!(last.author(), Author::Assistant);
    assert!(!last.is_pending());
    assert!(last.is_error());
    assert!(!last.text().contains("connection reset"));
    assert_eq!(session.state(), TurnState::Idle);
}

#[test]
fn later_requests_carry_full_history_including_errors() {
    let mut session = open_ended_session();
    let provider = MockProvider::new(vec![
        Err(CompletionError::ApiStatus(503)),
        Ok("second reply".to_string()),
    ]);
    let mut host = QueueHost::new(provider);

    session.submit("one", &mut host);
    host.resolve_all(&mut session);
    session.submit("two", &mut host);
    host.resolve_all(&mut session);

    let requests = host.provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].history.len(), 1);
    assert_eq!(requests[1].history.len(), 3);
    assert_eq!(requests[1].user_text, "two");
    assert_eq!(requests[1].persona, "You are a debater.");
}
