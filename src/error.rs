// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// Faults raised while building or populating an object graph.
///
/// Any of them aborts the traversal that raised it.
#[derive(Debug, Error)]
pub enum InitializeError {
    /// Node metadata is write-once.
    #[error("Overwriting calculated node data is not allowed (path '{path}')")]
    CalculatedNodeDataAlreadySet { path: String },

    /// A child was created under a node whose metadata was never calculated.
    #[error("Node at path '{path}' has no calculated node data")]
    MissingCalculatedNodeData { path: String },

    #[error("Operation '{operation}' is not supported on {node} node (path '{path}')")]
    UnsupportedOperation {
        operation: &'static str,
        node: &'static str,
        path: String,
    },

    /// The property has no accessor for the requested operation.
    #[error("Property '{property}' has no {operation} accessor")]
    NoAccessor {
        property: String,
        operation: &'static str,
    },

    /// The accessor exists but invoking it failed.
    #[error("Unable to use {operation} accessor of property '{property}'")]
    AccessorFailed {
        property: String,
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Class '{0}' is not registered")]
    UnknownClass(String),

    /// Only classes have properties to populate.
    #[error("Type '{0}' is not a class")]
    NotAClass(String),

    #[error("Maximum traversal depth {limit} exceeded at path '{path}'")]
    DepthLimitExceeded { path: String, limit: usize },

    #[error("No rule applies to path '{path}'")]
    NoApplicableRule { path: String },
}
