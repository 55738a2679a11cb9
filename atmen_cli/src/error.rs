use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid secret book: {0}")]
    InvalidSecretBook(#[from] serde_yml::Error),
}
