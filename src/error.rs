use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoinError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0} id is required")]
    MissingId(&'static str),

    #[error("nothing to update")]
    EmptyPatch,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid toml: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("could not write toml: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl JoinError {
    /// Returns true for errors the server raised because the session token is stale.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, JoinError::Status { status: 401 | 403, .. })
    }
}

pub type JoinResult<T> = Result<T, JoinError>;
