use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::domain::models::AssistantRef;
use crate::domain::models::ChatError;

#[derive(Debug, Default, Clone, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum BackendName {
    #[default]
    OpenAI,
}

impl BackendName {
    #[allow(dead_code)]
    pub fn parse(s: String) -> Option<BackendName> {
        BackendName::iter().find(|e| e.to_string() == s)
    }
}

/// Terminal status of a run as reported by the remote service.
/// `await_run_terminal` only ever returns terminal statuses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunStatus(String);

impl RunStatus {
    pub fn new(status: &str) -> RunStatus {
        return RunStatus(status.to_string());
    }

    pub fn is_completed(&self) -> bool {
        return self.0 == "completed";
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ThreadRole {
    #[default]
    User,
    Assistant,
}

/// A message as stored on the remote thread, validated at the service
/// boundary. `content` holds the text segments of the message in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreadMessage {
    pub role: ThreadRole,
    pub run_id: Option<String>,
    pub content: Vec<String>,
}

/// Transient result of one run round trip. `response_text` is present only
/// when the run completed and an assistant message scoped to it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub response_text: Option<String>,
}

/// Capability surface of the remote assistant service. One implementation per
/// vendor; the conversation session manager only ever talks through this.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    fn name(&self) -> BackendName;
    async fn list_assistants(&self) -> Result<Vec<AssistantRef>, ChatError>;
    async fn create_thread(&self) -> Result<String, ChatError>;
    async fn post_message(&self, thread_id: &str, text: &str) -> Result<(), ChatError>;
    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<String, ChatError>;
    async fn await_run_terminal(&self, thread_id: &str, run_id: &str)
        -> Result<RunStatus, ChatError>;
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ChatError>;
}

pub type BackendBox = Arc<dyn AssistantBackend>;
