use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Everything that can go wrong talking to the project API. Nothing is retried or
/// recovered locally; callers decide how to surface these.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to `{url}` failed")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("server responded with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("could not decode response body")]
    Decode(#[from] serde_json::Error),

    #[error("invalid address `{address}`")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn transport(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    /// The HTTP status of a [`ApiError::Remote`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
