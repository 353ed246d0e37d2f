use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Snapshot store error: {0}")]
    Store(String),

    #[error("Host channel error: {0}")]
    Channel(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
