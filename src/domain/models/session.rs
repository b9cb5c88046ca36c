#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use super::Author;
use super::Message;

/// The conversation session: one per interactive process, owned by the
/// calling shell and passed explicitly into every operation.
///
/// Invariant: a thread and its transcript belong to exactly one assistant
/// selection. Selecting a different assistant invalidates both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub selected_assistant_id: Option<String>,
    pub thread_id: Option<String>,
    pub transcript: Vec<Message>,
}

impl Session {
    /// Unconditional reset on a different selection, never a merge. Selecting
    /// the assistant that is already active is a no-op.
    pub fn select_assistant(&mut self, assistant_id: &str) {
        if self.selected_assistant_id.as_deref() == Some(assistant_id) {
            return;
        }

        self.thread_id = None;
        self.transcript.clear();
        self.selected_assistant_id = Some(assistant_id.to_string());
    }

    pub fn push_user(&mut self, text: &str) {
        self.transcript.push(Message::new(Author::User, text));
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.transcript.push(Message::new(Author::Assistant, text));
    }
}
