use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Service(String),

    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AppError {
    /// Message surfaced in the UI: the server-provided detail for service
    /// errors, the transport error's own message otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service(msg) => msg.clone(),
            Self::Transport(err) => err.to_string(),
        }
    }
}
