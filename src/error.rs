use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("unexpected status {0}")]
    Unexpected(u16),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
