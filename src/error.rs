//! Error taxonomy shared by the status store and the narrative editor.
//!
//! Every operation either completes its full read-transform-write cycle or
//! fails before writing anything; there are no partial-success states.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    /// A required file or record identifier is missing.
    #[error("not found: {0}")]
    NotFound(String),

    /// An enum-valued input (phase name, story state) was not recognized.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
