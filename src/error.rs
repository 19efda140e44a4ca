use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirmanError {
    #[error("Mirror validation failed: {0}")]
    MirrorValidation(String),

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("Manifest parsing failed: {0}")]
    ManifestParsing(String),

    #[error("Working directory error: {0}")]
    WorkingDir(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MirmanError>;
