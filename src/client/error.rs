pub const GENERIC_FAILURE: &str = "Translation failed. Please try again.";

/// Failures surfaced to the user by the translator view
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Please enter text to translate")]
    MissingInput,

    #[error("Source and target languages must be different")]
    SameLanguage,

    /// The proxy answered with an `{error}` body
    #[error("{0}")]
    Server(String),

    #[error("Translation failed. Please try again.")]
    Transport(#[source] reqwest::Error),

    #[error("Translation failed. Please try again.")]
    Unexpected(String),
}

impl ClientError {
    /// Text shown in the notification surface
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server(message) if message.trim().is_empty() => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}
