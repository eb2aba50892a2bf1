use std::path::PathBuf;
use thiserror::Error;

/// Boxed error produced by a `Transport` when a request cannot be sent.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, UploadError>;

#[derive(Error, Debug)]
pub enum UploadError {
    /// The file to upload does not exist
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Stat, open or read of the local file failed
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was rejected by the local upload policy
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request could not be sent or the response could not be read
    #[error("failed to send upload request")]
    Transport(#[source] TransportError),

    /// The service answered with a non-200 status
    #[error("API returned non-OK status: {status} - {body}")]
    Server { status: u16, body: String },

    /// The response body was not a valid envelope
    #[error("failed to decode response")]
    Decode(#[from] serde_json::Error),

    /// The service reported an application error
    #[error("{message}")]
    Remote { message: String },

    #[error("unknown response status")]
    UnknownStatus,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file is {size} bytes, exceeds maximum size of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("unsupported file type: {extension:?}")]
    UnsupportedExtension { extension: String },
}
