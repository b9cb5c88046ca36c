#[derive(Debug, Clone)]
pub enum Action {
    /// One user submission. `thread_id` is `None` until the remote service
    /// has created a thread for the current selection; the worker creates it
    /// lazily and reports it back with `Event::ThreadReady`.
    SubmitMessage {
        assistant_id: String,
        thread_id: Option<String>,
        text: String,
    },
}
