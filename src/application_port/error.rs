use crate::domain_port::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("csrf token unavailable: {0}")]
    Csrf(String),
    #[error("token refresh failed: {0}")]
    Refresh(String),
    #[error("not authenticated")]
    Unauthorized,
    #[error("session expired")]
    SessionExpired,
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("csv line {line}: {reason}")]
    Csv { line: usize, reason: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Text shown inline to the operator. Never includes token material.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Unauthorized => "Not logged in. Please log in.".to_string(),
            ApiError::SessionExpired => "Session expired. Please log in again.".to_string(),
            ApiError::Transport(_) | ApiError::Csrf(_) => {
                "Cannot connect to server. Please ensure the backend is running.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether the caller should be sent back to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::SessionExpired)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Store(error.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}
