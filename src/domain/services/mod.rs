mod actions;
mod app_state;
mod bubble_list;
mod conversation;
mod events;
mod scroll;

pub use actions::ActionsService;
pub use app_state::AppState;
pub use app_state::AppStateProps;
pub use bubble_list::BubbleList;
pub use conversation::resolve_outcome;
pub use conversation::ConversationService;
pub use events::EventsService;
pub use scroll::Scroll;
