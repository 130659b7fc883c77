//! Error types for page generation

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The .docx container could not be opened as a zip archive
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("xml error in {part}: {message}")]
    Xml { part: String, message: String },

    /// A required part is absent from the package (e.g. word/document.xml)
    #[error("missing package part: {0}")]
    MissingPart(String),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown page: {0}")]
    UnknownPage(String),
}
