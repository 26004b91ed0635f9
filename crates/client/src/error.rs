use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Why a call to the remote API did not produce a usable value.
///
/// None of these is retried automatically; the caller reports it and the
/// user re-triggers the action.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No bearer token was configured. Nothing was sent.
    #[error("No authentication token found. Please log in again.")]
    MissingToken,
    #[error("invalid base_url: {0}")]
    BaseUrl(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("rejected: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The response decoded to something that violates the data model.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict(body),
            400 | 422 => Self::Validation(body),
            _ => Self::Server(body),
        }
    }

    /// Credential problems ask the user to log in again rather than retry.
    pub fn needs_login(&self) -> bool {
        matches!(self, Self::MissingToken | Self::Unauthorized)
    }
}

impl From<engine::EngineError> for ClientError {
    fn from(value: engine::EngineError) -> Self {
        Self::MalformedResponse(value.to_string())
    }
}
