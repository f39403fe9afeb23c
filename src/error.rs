//! Error type shared by the library and the command line interface.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The instance file is malformed or inconsistent.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),
    /// A node index does not address a row of the cost matrix.
    #[error("node index {index} out of range for a {size}x{size} cost matrix")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_instance(message: impl Into<String>) -> Self {
        Self::InvalidInstance(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
