#[cfg(test)]
#[path = "openai_assistants_test.rs"]
mod tests;

use std::env;
use std::time::Duration;
use std::time::Instant;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AssistantBackend;
use crate::domain::models::AssistantRef;
use crate::domain::models::BackendName;
use crate::domain::models::ChatError;
use crate::domain::models::RunStatus;
use crate::domain::models::ThreadMessage;
use crate::domain::models::ThreadRole;

// Statuses the service reports while a run is still making progress.
const NON_TERMINAL_STATUSES: [&str; 3] = ["queued", "in_progress", "cancelling"];

/// Client for the OpenAI Assistants v2 API. One instance per process; every
/// call carries bearer auth and the assistants beta header.
pub struct OpenAIAssistants {
    url: String,
    api_key: String,
    client: reqwest::Client,
    poll_interval: Duration,
    poll_timeout: Option<Duration>,
}

impl OpenAIAssistants {
    pub fn new(api_key: &str) -> OpenAIAssistants {
        return OpenAIAssistants {
            url: Config::default(ConfigKey::OpenAIURL),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            poll_interval: Duration::from_millis(750),
            poll_timeout: Some(Duration::from_secs(300)),
        };
    }

    /// Builds the client from `OPENAI_API_KEY` and the loaded configuration.
    /// The credential check happens here, before any remote call is possible.
    pub fn from_env() -> Result<OpenAIAssistants, ChatError> {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(ChatError::CredentialMissing);
        }

        let mut backend = OpenAIAssistants::new(&api_key);

        let url = Config::get(ConfigKey::OpenAIURL);
        if !url.is_empty() {
            backend.url = url;
        }
        if let Ok(interval) = Config::get(ConfigKey::PollInterval).parse::<u64>() {
            backend.poll_interval = Duration::from_millis(interval.max(1));
        }
        if let Ok(timeout) = Config::get(ConfigKey::PollTimeout).parse::<u64>() {
            // 0 keeps the original wait-forever behavior.
            backend.poll_timeout = if timeout == 0 {
                None
            } else {
                Some(Duration::from_secs(timeout))
            };
        }

        return Ok(backend);
    }

    /// Overrides the base URL (proxies or local test servers).
    pub fn with_url(mut self, url: &str) -> OpenAIAssistants {
        self.url = url.to_string();
        return self;
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> OpenAIAssistants {
        self.poll_interval = interval;
        return self;
    }

    pub fn with_poll_timeout(mut self, timeout: Option<Duration>) -> OpenAIAssistants {
        self.poll_timeout = timeout;
        return self;
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{}{}", self.url.trim_end_matches('/'), path);
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChatError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .send()
            .await?;

        return read_response(path, response).await;
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ChatError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
            .json(&body)
            .send()
            .await?;

        return read_response(path, response).await;
    }
}

async fn read_response<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, ChatError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::error!(path = path, status = status.as_u16(), body = %body, "OpenAI request failed");
        return Err(ChatError::Other(anyhow!(
            "OpenAI request failed with status {status}: {body}"
        )));
    }

    return Ok(response.json::<T>().await?);
}

#[derive(Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

#[derive(Deserialize)]
struct AssistantObject {
    id: String,
    // The API allows assistants without a name.
    name: Option<String>,
}

#[derive(Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Deserialize)]
struct RunObject {
    id: String,
    status: String,
}

#[derive(Deserialize)]
struct MessageObject {
    role: String,
    run_id: Option<String>,
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    value: String,
}

#[async_trait]
impl AssistantBackend for OpenAIAssistants {
    fn name(&self) -> BackendName {
        BackendName::OpenAI
    }

    /// The service pages listings at 100 entries, so this follows `after`
    /// cursors until the listing is exhausted.
    async fn list_assistants(&self) -> Result<Vec<AssistantRef>, ChatError> {
        let mut assistants: Vec<AssistantRef> = vec![];
        let mut after: Option<String> = None;

        loop {
            let mut path = "/v1/assistants?order=desc&limit=100".to_string();
            if let Some(cursor) = after.as_ref() {
                path.push_str(&format!("&after={cursor}"));
            }

            let res: ListResponse<AssistantObject> = self
                .get_json(&path)
                .await
                .map_err(|err| ChatError::ServiceUnavailable(err.to_string()))?;

            let has_more = res.has_more;
            after = res
                .last_id
                .clone()
                .or_else(|| res.data.last().map(|assistant| assistant.id.clone()));

            assistants.extend(res.data.into_iter().map(|assistant| {
                let name = assistant
                    .name
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| assistant.id.clone());
                return AssistantRef {
                    id: assistant.id,
                    name,
                };
            }));

            if !has_more || after.is_none() {
                break;
            }
        }

        return Ok(assistants);
    }

    async fn create_thread(&self) -> Result<String, ChatError> {
        let thread: ThreadObject = self.post_json("/v1/threads", json!({})).await?;
        return Ok(thread.id);
    }

    async fn post_message(&self, thread_id: &str, text: &str) -> Result<(), ChatError> {
        let _: Value = self
            .post_json(
                &format!("/v1/threads/{thread_id}/messages"),
                json!({ "role": "user", "content": text }),
            )
            .await?;
        return Ok(());
    }

    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<String, ChatError> {
        let run: RunObject = self
            .post_json(
                &format!("/v1/threads/{thread_id}/runs"),
                json!({ "assistant_id": assistant_id }),
            )
            .await?;
        return Ok(run.id);
    }

    /// Blocks until the run is terminal, checking every `poll_interval`. A
    /// configured deadline surfaces as the synthetic `timeout` status.
    async fn await_run_terminal(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<RunStatus, ChatError> {
        let started = Instant::now();

        loop {
            let run: RunObject = self
                .get_json(&format!("/v1/threads/{thread_id}/runs/{run_id}"))
                .await?;

            if !NON_TERMINAL_STATUSES.contains(&run.status.as_str()) {
                tracing::debug!(run_id = %run.id, status = %run.status, "run reached terminal status");
                return Ok(RunStatus::new(&run.status));
            }

            if let Some(timeout) = self.poll_timeout {
                if started.elapsed() >= timeout {
                    tracing::warn!(run_id = %run.id, "gave up polling the run");
                    return Ok(RunStatus::new("timeout"));
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Returns the newest page of the thread, newest message first. A run's
    /// reply is always among the newest messages, so one descending page is
    /// enough no matter how long the thread has grown.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ChatError> {
        let res: ListResponse<MessageObject> = self
            .get_json(&format!("/v1/threads/{thread_id}/messages?order=desc&limit=100"))
            .await?;

        let messages = res
            .data
            .into_iter()
            .map(|msg| ThreadMessage {
                role: msg.role.parse::<ThreadRole>().unwrap_or_default(),
                run_id: msg.run_id,
                content: msg
                    .content
                    .into_iter()
                    .filter(|block| block.kind == "text")
                    .filter_map(|block| block.text.map(|text| text.value))
                    .collect(),
            })
            .collect();

        return Ok(messages);
    }
}
