//! Terminal chat client for the OpenAI Assistants API.
//!
//! This crate drives one conversation session per interactive process: pick a
//! pre-configured assistant, exchange messages on a remote thread, and watch
//! the transcript as role-tagged bubbles. Selecting a different assistant
//! starts the conversation over on a fresh thread.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::ui::{destruct_terminal_for_panic, start_loop};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{
    Action, AssistantBackend, AssistantRef, Author, BackendBox, ChatError, Event, Message, Session,
};
pub use domain::services::{AppStateProps, ConversationService};
pub use infrastructure::clients::BackendManager;
