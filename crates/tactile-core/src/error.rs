//! Error types for widget construction and lifecycle operations

use thiserror_no_std::Error;

use crate::host::HostError;

/// Errors returned when a widget cannot be created or bound to a node.
///
/// Construction never leaves a half-built widget behind: when one of these is
/// returned, any node created along the way has already been deleted and the
/// state block has been dropped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WidgetError {
    /// The parent handle does not refer to a live node
    #[error("Parent node is missing or has been deleted")]
    InvalidParent,

    /// A callback the widget cannot work without was not supplied
    #[error("Required callback is missing: {0}")]
    MissingCallback(&'static str),

    /// A gallery needs at least one image
    #[error("Gallery has no images")]
    EmptyGallery,

    /// A gallery entry has no image source
    #[error("Gallery image {index} has no source")]
    MissingImage {
        /// Position of the offending entry
        index: usize,
    },

    /// The node already owns a widget state block
    #[error("Node already owns widget state")]
    AlreadyBound,

    /// The host refused an operation
    #[error("Host error: {0}")]
    Host(HostError),
}

impl From<HostError> for WidgetError {
    fn from(err: HostError) -> Self {
        WidgetError::Host(err)
    }
}

/// Result type for widget operations
pub type WidgetResult<T> = Result<T, WidgetError>;
