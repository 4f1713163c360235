//! Error types for the viewer library.
//!
//! Everything that can be rejected by the session (bad shapes, bad titles,
//! forbidden dock actions, non-finite arithmetic) ends up here. Glue code in
//! the binary and config layer uses `anyhow` on top of this.

use thiserror::Error;

use crate::entities::stack::StackShape;

/// Result alias for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("array provided has shape {found}, but it must be same as others ({expected})")]
    ShapeMismatch {
        expected: StackShape,
        found: StackShape,
    },

    #[error("must be a 3 dimensional array (time, y, x), got {ndim} dimension(s) {shape:?}")]
    NotThreeDimensional { ndim: usize, shape: Vec<usize> },

    #[error("result of '{title}' contains NaNs or infinities ({count} non-finite values)")]
    NonFiniteResult { title: String, count: usize },

    #[error("no arrays were provided")]
    EmptyInput,

    #[error("got {arrays} arrays but {titles} titles")]
    TitleCountMismatch { arrays: usize, titles: usize },

    #[error("unknown dock {0}")]
    UnknownDock(uuid::Uuid),

    #[error("no original array titled '{0}'")]
    UnknownTitle(String),

    #[error("dock '{0}' is an original and cannot be closed")]
    NotClosable(String),

    #[error("dock '{0}' is a duplicate and cannot be duplicated again")]
    NotDuplicable(String),

    #[error("cannot change colour settings of '{0}' while a threshold rule is active")]
    ThresholdActive(String),

    #[error("nothing has been copied for the {0} panel")]
    EmptyClipboard(&'static str),

    #[error("invalid payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("viewer window failed: {0}")]
    Gui(String),
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::Payload(err.to_string())
    }
}
