use std::time::Duration;

use mockito::Matcher;

use super::OpenAIAssistants;
use crate::domain::models::AssistantBackend;
use crate::domain::models::ChatError;
use crate::domain::models::ThreadRole;

#[test]
fn it_requires_the_credential_before_any_remote_call() {
    std::env::remove_var("OPENAI_API_KEY");
    let res = OpenAIAssistants::from_env();
    assert!(matches!(res, Err(ChatError::CredentialMissing)));
}

fn backend_for(server: &mockito::ServerGuard) -> OpenAIAssistants {
    return OpenAIAssistants::new("test-key")
        .with_url(&server.url())
        .with_poll_interval(Duration::from_millis(1))
        .with_poll_timeout(Some(Duration::from_millis(50)));
}

#[tokio::test]
async fn it_lists_assistants_with_auth_and_beta_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/assistants?order=desc&limit=100")
        .match_header("authorization", "Bearer test-key")
        .match_header("openai-beta", "assistants=v2")
        .with_body(
            r#"{"data": [
                {"id": "a1", "name": "Helper"},
                {"id": "a2", "name": null}
            ], "has_more": false, "last_id": "a2"}"#,
        )
        .create_async()
        .await;

    let assistants = backend_for(&server).list_assistants().await.unwrap();

    mock.assert_async().await;
    assert_eq!(assistants.len(), 2);
    assert_eq!(assistants[0].id, "a1");
    assert_eq!(assistants[0].name, "Helper");
    // Unnamed assistants fall back to their id so they stay selectable.
    assert_eq!(assistants[1].name, "a2");
}

#[tokio::test]
async fn it_follows_the_cursor_when_the_listing_has_more_pages() {
    let mut server = mockito::Server::new_async().await;
    let first_page = server
        .mock("GET", "/v1/assistants?order=desc&limit=100")
        .with_body(
            r#"{"data": [
                {"id": "a1", "name": "Helper"}
            ], "has_more": true, "last_id": "a1"}"#,
        )
        .create_async()
        .await;
    let second_page = server
        .mock("GET", "/v1/assistants?order=desc&limit=100&after=a1")
        .with_body(
            r#"{"data": [
                {"id": "a2", "name": "Coder"}
            ], "has_more": false, "last_id": "a2"}"#,
        )
        .create_async()
        .await;

    let assistants = backend_for(&server).list_assistants().await.unwrap();

    first_page.assert_async().await;
    second_page.assert_async().await;
    assert_eq!(assistants.len(), 2);
    assert_eq!(assistants[0].id, "a1");
    assert_eq!(assistants[1].id, "a2");
}

#[tokio::test]
async fn it_maps_listing_failures_to_service_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/assistants")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let res = backend_for(&server).list_assistants().await;
    assert!(matches!(res, Err(ChatError::ServiceUnavailable(ref msg)) if msg.contains("500")));
}

#[tokio::test]
async fn it_creates_a_thread() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/threads")
        .with_body(r#"{"id": "thread_1", "object": "thread"}"#)
        .create_async()
        .await;

    let thread_id = backend_for(&server).create_thread().await.unwrap();
    assert_eq!(thread_id, "thread_1");
}

#[tokio::test]
async fn it_posts_the_user_message_on_the_thread() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/threads/thread_1/messages")
        .match_body(Matcher::Json(serde_json::json!({
            "role": "user",
            "content": "Hi"
        })))
        .with_body(r#"{"id": "msg_1", "role": "user"}"#)
        .create_async()
        .await;

    backend_for(&server)
        .post_message("thread_1", "Hi")
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn it_starts_a_run_for_the_selected_assistant() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/threads/thread_1/runs")
        .match_body(Matcher::Json(serde_json::json!({ "assistant_id": "a1" })))
        .with_body(r#"{"id": "run_1", "status": "queued"}"#)
        .create_async()
        .await;

    let run_id = backend_for(&server).start_run("thread_1", "a1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(run_id, "run_1");
}

#[tokio::test]
async fn it_returns_a_terminal_run_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/threads/thread_1/runs/run_1")
        .with_body(r#"{"id": "run_1", "status": "completed"}"#)
        .create_async()
        .await;

    let status = backend_for(&server)
        .await_run_terminal("thread_1", "run_1")
        .await
        .unwrap();
    assert!(status.is_completed());
}

#[tokio::test]
async fn it_gives_up_after_the_polling_deadline() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/threads/thread_1/runs/run_1")
        .with_body(r#"{"id": "run_1", "status": "in_progress"}"#)
        .expect_at_least(1)
        .create_async()
        .await;

    let status = backend_for(&server)
        .await_run_terminal("thread_1", "run_1")
        .await
        .unwrap();

    assert!(!status.is_completed());
    assert_eq!(status.as_str(), "timeout");
}

#[tokio::test]
async fn it_parses_thread_messages_and_text_segments() {
    let mut server = mockito::Server::new_async().await;
    // Newest first: the reply for the run precedes the user's message.
    let mock = server
        .mock("GET", "/v1/threads/thread_1/messages?order=desc&limit=100")
        .with_body(
            r#"{"data": [
                {"role": "assistant", "run_id": "run_1", "content": [
                    {"type": "image_file", "text": null},
                    {"type": "text", "text": {"value": "Hello, "}},
                    {"type": "text", "text": {"value": "world!"}}
                ]},
                {"role": "user", "run_id": null, "content": [
                    {"type": "text", "text": {"value": "Hi"}}
                ]}
            ]}"#,
        )
        .create_async()
        .await;

    let messages = backend_for(&server).list_messages("thread_1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ThreadRole::Assistant);
    assert_eq!(messages[0].run_id.as_deref(), Some("run_1"));
    assert_eq!(messages[0].content, vec!["Hello, ", "world!"]);
    assert_eq!(messages[1].role, ThreadRole::User);
}
