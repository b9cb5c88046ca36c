pub mod openai_assistants;

use std::sync::Arc;

use crate::domain::models::BackendBox;
use crate::domain::models::BackendName;
use crate::domain::models::ChatError;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(name: BackendName) -> Result<BackendBox, ChatError> {
        match name {
            BackendName::OpenAI => {
                return Ok(Arc::new(openai_assistants::OpenAIAssistants::from_env()?));
            }
        }
    }
}
