use thiserror::Error;

#[derive(Error, Debug)]
pub enum RickdexError {
    #[error("Transport error: {0}")]
    Transport(Box<reqwest::Error>),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Custom(String),
}

impl From<reqwest::Error> for RickdexError {
    fn from(error: reqwest::Error) -> Self {
        RickdexError::Transport(Box::new(error))
    }
}
