use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Receive(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error("message serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for sentinel_core::Error {
    fn from(err: Error) -> Self {
        sentinel_core::Error::Queue(err.to_string())
    }
}
