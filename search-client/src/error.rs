use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a usable answer (connection, timeout,
    /// non-2xx status).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered and reported a logical error. Shown verbatim.
    #[error("{0}")]
    Backend(String),

    /// Rejected before any network call.
    #[error("{0}")]
    Precondition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::Transport(format!("invalid response body: {err}"));
        }
        ClientError::Transport(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Config(format!("invalid url: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
