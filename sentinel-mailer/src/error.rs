use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("mail provider returned status {0}")]
    ProviderStatus(u16),

    #[error("mail provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for sentinel_core::Error {
    fn from(err: Error) -> Self {
        sentinel_core::Error::Mail(err.to_string())
    }
}
