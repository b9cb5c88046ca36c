use tui_textarea::Input;

use super::ChatError;

#[derive(Debug)]
pub enum Event {
    AssistantReply(String),
    ThreadReady(String),
    ConversationError(ChatError),
    KeyboardCharInput(Input),
    KeyboardCTRLC,
    KeyboardCTRLL,
    KeyboardCTRLO,
    KeyboardEnter,
    KeyboardPaste(String),
    UITick,
    UIScrollDown,
    UIScrollUp,
    UIScrollPageDown,
    UIScrollPageUp,
}
