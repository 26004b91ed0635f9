use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("unknown timezone: {0}")]
    Timezone(String),
    #[error(transparent)]
    Client(#[from] client::ClientError),
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Input(String),
}

impl AppError {
    /// Line printed on stderr before exiting with status 1.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(err) if err.needs_login() => {
                format!("{err} Run `dhanvikas login` to start a new session.")
            }
            Self::Client(client::ClientError::Transport(_)) => {
                format!("{self}. Is the server reachable?")
            }
            other => other.to_string(),
        }
    }
}
