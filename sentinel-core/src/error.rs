use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("database error: {0}")]
    Database(String),

    #[error("alert config not found for website {0}")]
    AlertConfigNotFound(u64),

    #[error("incident not found for website {0}")]
    IncidentNotFound(u64),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("queue error: {0}")]
    Queue(String),

    #[error("mail provider error: {0}")]
    Mail(String),

    #[error("probe transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
