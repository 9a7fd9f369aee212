use miette::Diagnostic;
use thiserror::Error;

/// Main error type for mewup operations
#[derive(Error, Diagnostic, Debug)]
pub enum MewError {
    #[error("IO error: {0}")]
    #[diagnostic(code(mewup::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(mewup::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Archive error with {path}: {message}")]
    #[diagnostic(code(mewup::archive))]
    Archive {
        path: std::path::PathBuf,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, MewError>;
