use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, Default)]
pub enum Author {
    #[default]
    User,
    Assistant,
    /// The client's own voice, used for notices and error bubbles.
    Parley,
}
