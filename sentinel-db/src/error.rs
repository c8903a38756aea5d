use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("row not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for sentinel_core::Error {
    fn from(err: Error) -> Self {
        sentinel_core::Error::Database(err.to_string())
    }
}
