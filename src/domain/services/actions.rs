#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use super::ConversationService;
use crate::domain::models::Action;
use crate::domain::models::Event;

/// Worker loop sitting between the UI and the remote service. One action is
/// handled to completion before the next is taken; the UI disables input
/// while a submission is in flight, so there is never more than one.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        conversation: Arc<ConversationService>,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        loop {
            if let Some(action) = rx.recv().await {
                match action {
                    Action::SubmitMessage {
                        assistant_id,
                        thread_id,
                        text,
                    } => {
                        submit(&conversation, assistant_id, thread_id, text, &event_tx).await?;
                    }
                }
            }
        }
    }
}

/// The remote half of a submission. The UI has already appended the user's
/// bubble; this reports the thread id (when one had to be created), then
/// either the assistant's reply or the typed error.
async fn submit(
    conversation: &ConversationService,
    assistant_id: String,
    thread_id: Option<String>,
    text: String,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let thread_id = match thread_id {
        Some(id) => id,
        None => match conversation.open_thread().await {
            Ok(id) => {
                event_tx.send(Event::ThreadReady(id.clone()))?;
                id
            }
            Err(err) => {
                event_tx.send(Event::ConversationError(err))?;
                return Ok(());
            }
        },
    };

    match conversation.round_trip(&assistant_id, &thread_id, &text).await {
        Ok(reply) => event_tx.send(Event::AssistantReply(reply))?,
        Err(err) => {
            tracing::error!(error = %err, "submission failed");
            event_tx.send(Event::ConversationError(err))?;
        }
    }

    Ok(())
}
