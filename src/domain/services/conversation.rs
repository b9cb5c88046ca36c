#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use anyhow::anyhow;

use crate::domain::models::AssistantRef;
use crate::domain::models::BackendBox;
use crate::domain::models::ChatError;
use crate::domain::models::RunOutcome;
use crate::domain::models::RunStatus;
use crate::domain::models::Session;
use crate::domain::models::ThreadMessage;
use crate::domain::models::ThreadRole;

/// Drives the session lifecycle: `Uninitialized → AssistantSelected →
/// ThreadReady ⇄ AwaitingRun`. Every operation takes the session value
/// explicitly; the interactive shell is responsible for holding it between
/// interactions.
pub struct ConversationService {
    backend: BackendBox,
}

impl ConversationService {
    pub fn new(backend: BackendBox) -> ConversationService {
        return ConversationService { backend };
    }

    /// Fetches the available assistants. An unreachable service or an empty
    /// listing both mean no session can be started.
    pub async fn initialize(&self) -> Result<Vec<AssistantRef>, ChatError> {
        let assistants = self.backend.list_assistants().await?;
        if assistants.is_empty() {
            return Err(ChatError::ServiceUnavailable(
                "the service returned no assistants".to_string(),
            ));
        }

        tracing::debug!(count = assistants.len(), "assistants listed");
        return Ok(assistants);
    }

    pub fn select_assistant(&self, session: &mut Session, assistant_id: &str) {
        session.select_assistant(assistant_id);
    }

    /// Creates the remote thread the first time it is needed. No-op once the
    /// session already has one.
    pub async fn ensure_thread(&self, session: &mut Session) -> Result<String, ChatError> {
        if let Some(thread_id) = session.thread_id.as_ref() {
            return Ok(thread_id.clone());
        }

        let thread_id = self.backend.create_thread().await?;
        tracing::debug!(thread_id = %thread_id, "thread created");
        session.thread_id = Some(thread_id.clone());
        return Ok(thread_id);
    }

    /// The one business operation: append the user's message, round-trip it
    /// through the remote service, and append the assistant's reply.
    ///
    /// The user message is appended before any remote call so a failure in
    /// steps 2-6 leaves a partial transcript on purpose. No retries anywhere.
    pub async fn submit_message(
        &self,
        session: &mut Session,
        user_text: &str,
    ) -> Result<(), ChatError> {
        if user_text.is_empty() {
            return Err(ChatError::Other(anyhow!("cannot submit an empty message")));
        }

        let assistant_id = session
            .selected_assistant_id
            .clone()
            .ok_or_else(|| ChatError::Other(anyhow!("no assistant is selected")))?;
        let thread_id = session
            .thread_id
            .clone()
            .ok_or_else(|| ChatError::Other(anyhow!("no thread exists for this session")))?;

        session.push_user(user_text);

        let response_text = self.round_trip(&assistant_id, &thread_id, user_text).await?;
        session.push_assistant(&response_text);

        return Ok(());
    }

    /// Steps 2-7 of a submission, minus the transcript appends: post the
    /// message, start a run, block until the run is terminal, and assemble
    /// the reply scoped to that run. Shared between `submit_message` and the
    /// actions worker, which performs the appends on the UI side.
    pub async fn round_trip(
        &self,
        assistant_id: &str,
        thread_id: &str,
        user_text: &str,
    ) -> Result<String, ChatError> {
        self.backend.post_message(thread_id, user_text).await?;

        let run_id = self.backend.start_run(thread_id, assistant_id).await?;
        tracing::debug!(thread_id = %thread_id, run_id = %run_id, "run started");

        let status = self.backend.await_run_terminal(thread_id, &run_id).await?;
        if !status.is_completed() {
            tracing::warn!(run_id = %run_id, status = %status, "run did not complete");
            return Err(ChatError::RunFailed {
                status: status.to_string(),
            });
        }

        let messages = self.backend.list_messages(thread_id).await?;
        let outcome = resolve_outcome(&run_id, status, &messages);
        match outcome.response_text {
            Some(text) => Ok(text),
            None => Err(ChatError::NoResponse),
        }
    }

    /// Creates a fresh remote thread. Used by the actions worker, which holds
    /// no session value of its own.
    pub async fn open_thread(&self) -> Result<String, ChatError> {
        let thread_id = self.backend.create_thread().await?;
        tracing::debug!(thread_id = %thread_id, "thread created");
        return Ok(thread_id);
    }
}

/// Picks the reply for a completed run: assistant-authored messages tagged
/// with this run's id only, so a stale reply from an earlier run is never
/// misattributed. Messages arrive newest first, so the first match is the
/// most recent by the service's own ordering. Text segments are joined in
/// order with no separator.
pub fn resolve_outcome(run_id: &str, status: RunStatus, messages: &[ThreadMessage]) -> RunOutcome {
    if !status.is_completed() {
        return RunOutcome {
            status,
            response_text: None,
        };
    }

    let response_text = messages
        .iter()
        .find(|msg| msg.role == ThreadRole::Assistant && msg.run_id.as_deref() == Some(run_id))
        .map(|msg| msg.content.concat());

    return RunOutcome {
        status,
        response_text,
    };
}
