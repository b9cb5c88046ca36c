#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
use serde::Deserialize;
use serde::Serialize;

use super::Author;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default, Debug)]
pub enum MessageType {
    #[default]
    Normal,
    Error,
}

/// One transcript entry. Entries are appended in chronological order and
/// never edited or removed afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default, Debug)]
pub struct Message {
    pub author: Author,
    pub text: String,
    pub message_type: MessageType,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            message_type: MessageType::Normal,
        };
    }

    pub fn new_with_type(author: Author, message_type: MessageType, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string().replace('\t', "  "),
            message_type,
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.message_type.clone();
    }
}
