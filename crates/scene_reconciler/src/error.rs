//! Reconciler error types

use crate::foundation::collections::{NodeId, ObjectId};

/// Errors raised while reconciling the declared tree onto the scene graph
///
/// Every error is synchronous and aborts the current host operation. No
/// rollback is attempted, so the tree and graph may be partially updated.
#[derive(thiserror::Error, Debug)]
pub enum ReconcileError {
    /// The element type name is not registered in the catalogue
    #[error("{0} is not part of the catalogue; did you forget to extend it?")]
    UnknownType(String),

    /// An opaque node was committed without an `object` property
    #[error("opaque nodes need an `object` property")]
    MissingObject,

    /// Text content was declared inside the scene tree
    #[error("text is not allowed in the scene tree: {0:?}")]
    TextNode(String),

    /// A dashed property path walked into a value with no such member
    #[error("cannot resolve `{path}`: segment `{segment}` is not reachable")]
    UnresolvedPath {
        /// Full property path
        path: String,
        /// First segment that could not be dereferenced
        segment: String,
    },

    /// A declared value has the wrong shape for the target it is written to
    #[error("invalid value for {target}: {reason}")]
    InvalidValue {
        /// What was being written (math type or slot)
        target: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A node handle that was never issued or has already been removed
    #[error("unknown tree node {0:?}")]
    UnknownNode(NodeId),

    /// An object handle that is not (or no longer) in the store
    #[error("unknown scene object {0:?}")]
    UnknownObject(ObjectId),

    /// A graph operation that would break the hierarchy
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),
}

impl ReconcileError {
    pub(crate) fn invalid_value(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for reconciler operations
pub type Result<T> = std::result::Result<T, ReconcileError>;
