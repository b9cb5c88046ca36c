use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use super::resolve_outcome;
use super::ConversationService;
use crate::domain::models::AssistantBackend;
use crate::domain::models::AssistantRef;
use crate::domain::models::Author;
use crate::domain::models::BackendName;
use crate::domain::models::ChatError;
use crate::domain::models::RunStatus;
use crate::domain::models::Session;
use crate::domain::models::ThreadMessage;
use crate::domain::models::ThreadRole;

struct MockBackend {
    assistants: Vec<AssistantRef>,
    listing_fails: bool,
    run_status: String,
    messages: Vec<ThreadMessage>,
    create_thread_calls: Mutex<usize>,
}

impl Default for MockBackend {
    fn default() -> MockBackend {
        return MockBackend {
            assistants: vec![
                AssistantRef::new("a1", "Helper"),
                AssistantRef::new("a2", "Coder"),
            ],
            listing_fails: false,
            run_status: "completed".to_string(),
            messages: vec![],
            create_thread_calls: Mutex::new(0),
        };
    }
}

impl MockBackend {
    fn reply(content: Vec<&str>, run_id: &str) -> ThreadMessage {
        return ThreadMessage {
            role: ThreadRole::Assistant,
            run_id: Some(run_id.to_string()),
            content: content.iter().map(|e| e.to_string()).collect(),
        };
    }
}

#[async_trait]
impl AssistantBackend for MockBackend {
    fn name(&self) -> BackendName {
        BackendName::OpenAI
    }

    async fn list_assistants(&self) -> Result<Vec<AssistantRef>, ChatError> {
        if self.listing_fails {
            return Err(ChatError::ServiceUnavailable("connection refused".to_string()));
        }
        Ok(self.assistants.clone())
    }

    async fn create_thread(&self) -> Result<String, ChatError> {
        *self.create_thread_calls.lock().unwrap() += 1;
        Ok("t1".to_string())
    }

    async fn post_message(&self, _thread_id: &str, _text: &str) -> Result<(), ChatError> {
        Ok(())
    }

    async fn start_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<String, ChatError> {
        Ok("run_1".to_string())
    }

    async fn await_run_terminal(
        &self,
        _thread_id: &str,
        _run_id: &str,
    ) -> Result<RunStatus, ChatError> {
        Ok(RunStatus::new(&self.run_status))
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, ChatError> {
        Ok(self.messages.clone())
    }
}

fn service_with(backend: MockBackend) -> ConversationService {
    return ConversationService::new(Arc::new(backend));
}

fn ready_session() -> Session {
    let mut session = Session::default();
    session.select_assistant("a2");
    session.thread_id = Some("t1".to_string());
    return session;
}

#[tokio::test]
async fn it_fails_to_initialize_when_the_listing_is_empty() {
    let service = service_with(MockBackend {
        assistants: vec![],
        ..Default::default()
    });

    let res = service.initialize().await;
    assert!(matches!(res, Err(ChatError::ServiceUnavailable(_))));
}

#[tokio::test]
async fn it_fails_to_initialize_when_the_service_is_unreachable() {
    let service = service_with(MockBackend {
        listing_fails: true,
        ..Default::default()
    });

    let res = service.initialize().await;
    assert!(matches!(res, Err(ChatError::ServiceUnavailable(_))));
}

#[tokio::test]
async fn it_selects_an_assistant_from_the_listing() {
    let service = service_with(MockBackend::default());
    let assistants = service.initialize().await.unwrap();

    let mut session = Session::default();
    service.select_assistant(&mut session, &assistants[1].id);

    assert_eq!(session.selected_assistant_id.as_deref(), Some("a2"));
}

#[tokio::test]
async fn it_creates_a_thread_exactly_once() {
    let backend = Arc::new(MockBackend::default());
    let service = ConversationService::new(backend.clone());
    let mut session = Session::default();
    session.select_assistant("a1");

    let first = service.ensure_thread(&mut session).await.unwrap();
    let second = service.ensure_thread(&mut session).await.unwrap();

    assert_eq!(first, "t1");
    assert_eq!(second, "t1");
    assert_eq!(*backend.create_thread_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn it_appends_a_user_and_assistant_pair_on_success() {
    let service = service_with(MockBackend {
        messages: vec![MockBackend::reply(vec!["Hello!"], "run_1")],
        ..Default::default()
    });
    let mut session = ready_session();

    service.submit_message(&mut session, "Hi").await.unwrap();

    assert_eq!(session.transcript.len(), 2);
    assert_eq!(session.transcript[0].author, Author::User);
    assert_eq!(session.transcript[0].text, "Hi");
    assert_eq!(session.transcript[1].author, Author::Assistant);
    assert_eq!(session.transcript[1].text, "Hello!");
}

#[tokio::test]
async fn it_keeps_only_the_user_message_when_the_run_fails() {
    let service = service_with(MockBackend {
        run_status: "failed".to_string(),
        ..Default::default()
    });
    let mut session = ready_session();

    let res = service.submit_message(&mut session, "Hi").await;

    assert!(matches!(res, Err(ChatError::RunFailed { ref status }) if status == "failed"));
    assert_eq!(session.transcript.len(), 1);
    assert_eq!(session.transcript[0].author, Author::User);
}

#[tokio::test]
async fn it_reports_no_response_when_no_message_matches_the_run() {
    let service = service_with(MockBackend {
        messages: vec![MockBackend::reply(vec!["stale"], "run_0")],
        ..Default::default()
    });
    let mut session = ready_session();

    let res = service.submit_message(&mut session, "Hi").await;

    assert!(matches!(res, Err(ChatError::NoResponse)));
    assert_eq!(session.transcript.len(), 1);
}

#[tokio::test]
async fn it_joins_content_segments_in_order() {
    let service = service_with(MockBackend {
        messages: vec![MockBackend::reply(vec!["Hello, ", "world!"], "run_1")],
        ..Default::default()
    });
    let mut session = ready_session();

    service.submit_message(&mut session, "Hi").await.unwrap();

    assert_eq!(session.transcript[1].text, "Hello, world!");
}

#[tokio::test]
async fn it_ignores_replies_from_earlier_runs() {
    let service = service_with(MockBackend {
        messages: vec![
            MockBackend::reply(vec!["fresh"], "run_1"),
            MockBackend::reply(vec!["stale"], "run_0"),
        ],
        ..Default::default()
    });
    let mut session = ready_session();

    service.submit_message(&mut session, "Hi").await.unwrap();

    assert_eq!(session.transcript[1].text, "fresh");
}

#[tokio::test]
async fn it_rejects_an_empty_submission() {
    let service = service_with(MockBackend::default());
    let mut session = ready_session();

    let res = service.submit_message(&mut session, "").await;

    assert!(res.is_err());
    assert!(session.transcript.is_empty());
}

#[test]
fn it_takes_the_most_recent_matching_reply() {
    // Newest first, matching the service's descending listing order.
    let messages = vec![
        MockBackend::reply(vec!["second"], "run_1"),
        MockBackend::reply(vec!["first"], "run_1"),
    ];

    let outcome = resolve_outcome("run_1", RunStatus::new("completed"), &messages);
    assert_eq!(outcome.response_text.as_deref(), Some("second"));
}

#[test]
fn it_finds_the_reply_at_the_top_of_a_long_thread() {
    // A long conversation: the reply sits at the head of the descending
    // listing, ahead of a window full of older exchanges.
    let mut messages = vec![MockBackend::reply(vec!["latest"], "run_150")];
    for n in (0..149).rev() {
        messages.push(MockBackend::reply(vec!["old"], &format!("run_{n}")));
    }

    let outcome = resolve_outcome("run_150", RunStatus::new("completed"), &messages);
    assert_eq!(outcome.response_text.as_deref(), Some("latest"));
}

#[test]
fn it_resolves_no_text_for_a_failed_run() {
    let messages = vec![MockBackend::reply(vec!["ignored"], "run_1")];

    let outcome = resolve_outcome("run_1", RunStatus::new("expired"), &messages);
    assert_eq!(outcome.response_text, None);
    assert_eq!(outcome.status.as_str(), "expired");
}

#[test]
fn it_skips_user_authored_messages_when_resolving() {
    let messages = vec![ThreadMessage {
        role: ThreadRole::User,
        run_id: Some("run_1".to_string()),
        content: vec!["Hi".to_string()],
    }];

    let outcome = resolve_outcome("run_1", RunStatus::new("completed"), &messages);
    assert_eq!(outcome.response_text, None);
}
