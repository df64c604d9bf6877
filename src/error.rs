//! Errors returned by the lock, unlock and status workflows.

use std::path::PathBuf;

use thiserror::Error;

use crate::barcode::BarcodeError;
use crate::config::ConfigError;
use crate::render::RenderError;
use crate::safe::SafeError;

/// Every way a workflow can abort. None of them are recoverable.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Settings could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The lock image could not be created or written.
    #[error(transparent)]
    File(#[from] RenderError),

    /// The unlock image could not be opened or decoded as a picture.
    #[error("Unable to read image {}: {source}", path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No barcode symbol could be produced for the payload.
    #[error("Unable to generate barcode: {0}")]
    Encoding(#[source] BarcodeError),

    /// The picture has no readable barcode, or the barcode is not ours.
    #[error("This is not a valid password image")]
    InvalidImage(#[source] Option<BarcodeError>),

    /// The request failed or the safe answered with an error status.
    #[error(transparent)]
    Safe(#[from] SafeError),

    /// The safe did not confirm the lock.
    #[error("Problem locking safe: {0}")]
    LockRejected(String),

    /// The safe locked but does not accept the new combination.
    #[error("Unable to verify lock worked: {0}")]
    VerifyFailed(String),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
