use thiserror::Error;

use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Invalid remote configuration: {0}")]
    Remote(#[from] SourceError),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
