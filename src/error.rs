//! Error type shared by the codec, the pixel matcher and the command line.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Bad command-line arguments; the message is shown to the user verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("cannot access '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode '{}' as PNG: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("{0}")]
    Comparison(String),
}

pub type Result<T> = std::result::Result<T, DiffError>;
