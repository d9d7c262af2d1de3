use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no element set on file for catalog number {0}")]
    NotFound(u64),
    #[error("element directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("element file read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid element set in {file}: {message}")]
    Parse { file: String, message: String },
}
