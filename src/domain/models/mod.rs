mod action;
mod assistant;
mod author;
mod backend;
mod error;
mod event;
mod message;
mod session;

pub use action::Action;
pub use assistant::AssistantRef;
pub use author::Author;
pub use backend::AssistantBackend;
pub use backend::BackendBox;
pub use backend::BackendName;
pub use backend::RunOutcome;
pub use backend::RunStatus;
pub use backend::ThreadMessage;
pub use backend::ThreadRole;
pub use error::ChatError;
pub use event::Event;
pub use message::Message;
pub use message::MessageType;
pub use session::Session;
