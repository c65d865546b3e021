// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cell::OnceCell;

use crate::error::InitializeError;
use crate::path::Path;
use crate::resolve::TypeVariableAssignment;
use crate::types::Type;

/// What is known about a node once its type has been resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatedNodeData {
    resolved_type: Type,
    type_variable_assignment: TypeVariableAssignment,
}

impl CalculatedNodeData {
    pub fn new(resolved_type: Type, type_variable_assignment: TypeVariableAssignment) -> Self {
        Self {
            resolved_type,
            type_variable_assignment,
        }
    }

    /// Data for a node whose type carries no generic information.
    pub fn of_type(resolved_type: Type) -> Self {
        Self::new(resolved_type, TypeVariableAssignment::empty())
    }

    /// Concrete type of the node's value, type variables substituted.
    pub fn resolved_type(&self) -> &Type {
        &self.resolved_type
    }

    /// Erasure of the resolved type.
    pub fn raw_type(&self) -> Type {
        self.resolved_type.erasure()
    }

    /// Assignment handed down to this node's children.
    pub fn type_variable_assignment(&self) -> &TypeVariableAssignment {
        &self.type_variable_assignment
    }
}

/// A path plus the node data calculated for it, which may be set only once.
#[derive(Clone, Debug, Default)]
pub struct PathContext {
    path: Path,
    calculated_node_data: OnceCell<CalculatedNodeData>,
}

impl PathContext {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            calculated_node_data: OnceCell::new(),
        }
    }

    /// Context whose node data is known up front.
    pub fn with_calculated_node_data(path: Path, calculated_node_data: CalculatedNodeData) -> Self {
        Self {
            path,
            calculated_node_data: OnceCell::from(calculated_node_data),
        }
    }

    /// Context of the traversal root.
    pub fn root() -> Self {
        Self::new(Path::new())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sub_path_context_traversing_property(&self, name: &str) -> PathContext {
        PathContext::new(self.path.sub_path_traversing_property(name))
    }

    pub fn sub_path_context_traversing_array(&self, index: usize) -> PathContext {
        PathContext::new(self.path.sub_path_traversing_array(index))
    }

    pub fn sub_path_context_traversing_map(&self, key: &str) -> PathContext {
        PathContext::new(self.path.sub_path_traversing_map(key))
    }

    pub fn calculated_node_data(&self) -> Option<&CalculatedNodeData> {
        self.calculated_node_data.get()
    }

    /// Record the node data. Fails if it was recorded before, whatever the
    /// new value is.
    pub fn set_calculated_node_data(
        &self,
        calculated_node_data: CalculatedNodeData,
    ) -> Result<(), InitializeError> {
        self.calculated_node_data
            .set(calculated_node_data)
            .map_err(|_| InitializeError::CalculatedNodeDataAlreadySet {
                path: self.path.to_string(),
            })
    }
}
