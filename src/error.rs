use thiserror::Error;

pub type TreeResult<T, E = TreeError> = Result<T, E>;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Corrupted tree: {0}")]
    Corrupted(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
