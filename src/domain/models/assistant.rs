use serde::Deserialize;
use serde::Serialize;

/// A remotely configured assistant, as returned by the listing call. The set
/// of assistants is read once at session start and does not change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantRef {
    pub id: String,
    pub name: String,
}

impl AssistantRef {
    pub fn new(id: &str, name: &str) -> AssistantRef {
        return AssistantRef {
            id: id.to_string(),
            name: name.to_string(),
        };
    }
}
