use thiserror::Error;

/// Failure taxonomy for the conversation session. Every failure is terminal
/// for the current operation only: it is surfaced at the outermost boundary
/// as an error bubble, never retried, and never swallowed.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("OPENAI_API_KEY is not set. Export it before starting parley-term.")]
    CredentialMissing,

    #[error("The assistant service is unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("The run ended with status '{status}'.")]
    RunFailed { status: String },

    #[error("The run completed but the assistant returned no reply.")]
    NoResponse,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Other(err.into())
    }
}
