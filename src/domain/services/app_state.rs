#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::BubbleList;
use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::AssistantRef;
use crate::domain::models::Author;
use crate::domain::models::ChatError;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Session;

pub struct AppStateProps {
    pub assistants: Vec<AssistantRef>,
}

/// State held by the UI loop between interactions: the session value, the
/// assistant picker, and the render-side dependants (bubbles, scrollbar).
pub struct AppState {
    pub assistants: Vec<AssistantRef>,
    pub session: Session,
    pub bubble_list: BubbleList,
    pub scroll: Scroll,
    pub picker_open: bool,
    pub picker_index: usize,
    pub waiting_for_backend: bool,
    pub exit_warning: bool,
    pub ticks: u64,
    pub last_known_height: usize,
    pub last_known_width: usize,
}

impl AppState {
    pub fn new(props: AppStateProps) -> AppState {
        return AppState {
            assistants: props.assistants,
            session: Session::default(),
            bubble_list: BubbleList::default(),
            scroll: Scroll::default(),
            // Selection is mandatory before chatting, so the picker starts open.
            picker_open: true,
            picker_index: 0,
            waiting_for_backend: false,
            exit_warning: false,
            ticks: 0,
            last_known_height: 0,
            last_known_width: 0,
        };
    }

    pub fn selected_assistant(&self) -> Option<&AssistantRef> {
        let selected_id = self.session.selected_assistant_id.as_deref()?;
        return self.assistants.iter().find(|e| e.id == selected_id);
    }

    pub fn picker_up(&mut self) {
        self.picker_index = self.picker_index.saturating_sub(1);
    }

    pub fn picker_down(&mut self) {
        if self.picker_index + 1 < self.assistants.len() {
            self.picker_index += 1;
        }
    }

    /// Applies the highlighted picker entry. A different assistant resets the
    /// thread and transcript; re-picking the current one changes nothing.
    pub fn confirm_selection(&mut self) {
        let assistant = self.assistants[self.picker_index].clone();
        let changed = self.session.selected_assistant_id.as_deref() != Some(assistant.id.as_str());

        self.session.select_assistant(&assistant.id);
        self.picker_open = false;

        if changed {
            tracing::info!(assistant_id = %assistant.id, "assistant selected");
            self.add_message(Message::new(
                Author::Parley,
                &format!("Now talking to {}. Type a message to get started.", assistant.name),
            ));
        }
    }

    /// Step one of a submission: the user's bubble is appended and rendered
    /// before the remote round trip begins.
    pub fn submit(&mut self, text: &str, action_tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let assistant_id = match self.session.selected_assistant_id.clone() {
            Some(id) => id,
            None => {
                self.picker_open = true;
                return Ok(());
            }
        };

        self.session.push_user(text);
        self.waiting_for_backend = true;
        self.sync_dependants();
        self.scroll.last();

        action_tx.send(Action::SubmitMessage {
            assistant_id,
            thread_id: self.session.thread_id.clone(),
            text: text.to_string(),
        })?;

        return Ok(());
    }

    pub fn handle_thread_ready(&mut self, thread_id: String) {
        self.session.thread_id = Some(thread_id);
    }

    pub fn handle_reply(&mut self, text: &str) {
        self.session.push_assistant(text);
        self.waiting_for_backend = false;
        self.sync_dependants();
        self.scroll.last();
    }

    /// Failures are terminal for the current operation only: the transcript
    /// keeps whatever the operation produced, and the user may submit again.
    pub fn handle_error(&mut self, err: &ChatError) {
        self.waiting_for_backend = false;
        self.add_message(Message::new_with_type(
            Author::Parley,
            MessageType::Error,
            &err.to_string(),
        ));
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width.into();
        self.last_known_height = rect.height.into();
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.session.transcript.push(message);
        self.sync_dependants();
        self.scroll.last();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(&self.session.transcript, self.last_known_width);

        let scrollbar_at_bottom = self.scroll.is_position_at_last();
        self.scroll
            .set_state(self.bubble_list.len(), self.last_known_height);

        if self.waiting_for_backend && scrollbar_at_bottom {
            self.scroll.last();
        }
    }
}
