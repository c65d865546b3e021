// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Nodes of the traversal tree.
//!
//! The tree mirrors the part of the object graph currently being visited.
//! The [`RootNode`] borrows the rule set; every other node borrows its parent,
//! so children never outlive the branch that created them and the root is
//! reached by following parent links.

use crate::context::{CalculatedNodeData, PathContext};
use crate::error::InitializeError;
use crate::generator::Generator;
use crate::path::Path;
use crate::property::PropertyDescriptor;
use crate::registry::Introspector;
use crate::resolve;
use crate::rules::{FindFirstApplicableRule, Rules};
use crate::types::Type;
use crate::value::Value;

#[derive(Debug)]
pub enum PathNode<'a> {
    Root(RootNode<'a>),
    Property(PropertyNode<'a>),
    CollectionItem(CollectionItemNode<'a>),
}

impl<'a> PathNode<'a> {
    pub fn is_root(&self) -> bool {
        matches!(self, PathNode::Root(_))
    }

    fn context(&self) -> &PathContext {
        match self {
            PathNode::Root(n) => &n.context,
            PathNode::Property(n) => &n.context,
            PathNode::CollectionItem(n) => &n.context,
        }
    }

    pub fn path(&self) -> &Path {
        self.context().path()
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.path().depth()
    }

    /// `None` for the root.
    pub fn parent(&self) -> Option<&'a PathNode<'a>> {
        match self {
            PathNode::Root(_) => None,
            PathNode::Property(n) => Some(n.parent),
            PathNode::CollectionItem(n) => Some(n.parent),
        }
    }

    /// The root this node transitively belongs to.
    pub fn root(&self) -> &RootNode<'a> {
        let mut node = self;
        loop {
            match node {
                PathNode::Root(root) => return root,
                PathNode::Property(n) => node = n.parent,
                PathNode::CollectionItem(n) => node = n.parent,
            }
        }
    }

    pub fn calculated_node_data(&self) -> Option<&CalculatedNodeData> {
        self.context().calculated_node_data()
    }

    /// Record this node's data. Nodes built by their constructors already
    /// carry data, so this only succeeds on a bare [`RootNode`].
    pub fn set_calculated_node_data(
        &self,
        calculated_node_data: CalculatedNodeData,
    ) -> Result<(), InitializeError> {
        self.context()
            .set_calculated_node_data(calculated_node_data)
    }

    /// Property name for property nodes.
    pub fn name(&self) -> Option<&str> {
        match self {
            PathNode::Property(n) => Some(n.property.name()),
            _ => None,
        }
    }

    /// Declaring class for property nodes.
    pub fn declaring_class(&self) -> Option<&str> {
        match self {
            PathNode::Property(n) => Some(n.declaring_class()),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            PathNode::Root(_) => "root",
            PathNode::Property(_) => "property",
            PathNode::CollectionItem(_) => "collection item",
        }
    }

    fn unsupported(&self, operation: &'static str) -> InitializeError {
        InitializeError::UnsupportedOperation {
            operation,
            node: self.kind(),
            path: self.path().to_string(),
        }
    }

    /// Read this node's value off the instance that contains it.
    pub fn current_value(&self, instance: &Value) -> Result<Value, InitializeError> {
        match self {
            PathNode::Property(n) => n.current_value(instance),
            // Items cannot be addressed in general collections.
            _ => Err(self.unsupported("current_value")),
        }
    }

    /// Write this node's value into the instance that contains it.
    pub fn set_value(&self, instance: &mut Value, value: Value) -> Result<(), InitializeError> {
        match self {
            PathNode::Property(n) => n.set_value(instance, value),
            _ => Err(self.unsupported("set_value")),
        }
    }

    /// Generator of the first root rule that accepts this node.
    pub fn generator_from_first_applicable_rule(
        &self,
        instance: &Value,
    ) -> Option<&'a dyn Generator> {
        self.root().generator_from_first_applicable_rule(instance, self)
    }
}

/// Root of a traversal. Has no parent, no value and an empty path.
#[derive(Debug)]
pub struct RootNode<'a> {
    rules: &'a Rules,
    context: PathContext,
}

impl<'a> RootNode<'a> {
    pub fn new(rules: &'a Rules) -> Self {
        Self {
            rules,
            context: PathContext::root(),
        }
    }

    /// Root of a graph of type `ty`; its data carries `ty`'s assignment so
    /// that root properties can be resolved.
    pub fn for_type(rules: &'a Rules, ty: &Type, introspector: &dyn Introspector) -> Self {
        let data = resolve::calculate_node_data(
            ty,
            &resolve::TypeVariableAssignment::empty(),
            introspector,
        );
        Self {
            rules,
            context: PathContext::with_calculated_node_data(Path::new(), data),
        }
    }

    pub fn rules(&self) -> &'a Rules {
        self.rules
    }

    /// Evaluate the rule set against `node`, which may be any node under
    /// this root.
    pub fn generator_from_first_applicable_rule(
        &self,
        instance: &Value,
        node: &PathNode<'_>,
    ) -> Option<&'a dyn Generator> {
        FindFirstApplicableRule::generator_from_first_applicable_rule(self.rules, instance, node)
    }
}

/// A property of the parent's value.
#[derive(Debug)]
pub struct PropertyNode<'a> {
    parent: &'a PathNode<'a>,
    context: PathContext,
    property: PropertyDescriptor,
}

impl<'a> PropertyNode<'a> {
    pub fn new(
        parent: &'a PathNode<'a>,
        property: PropertyDescriptor,
        introspector: &dyn Introspector,
    ) -> Result<Self, InitializeError> {
        let parent_data =
            parent
                .calculated_node_data()
                .ok_or_else(|| InitializeError::MissingCalculatedNodeData {
                    path: parent.path().to_string(),
                })?;

        let path = parent.path().sub_path_traversing_property(property.name());
        let data = resolve::calculate_node_data(
            property.declared_type(),
            parent_data.type_variable_assignment(),
            introspector,
        );

        Ok(Self {
            parent,
            context: PathContext::with_calculated_node_data(path, data),
            property,
        })
    }

    pub fn property(&self) -> &PropertyDescriptor {
        &self.property
    }

    pub fn declaring_class(&self) -> &str {
        self.property.declaring_class()
    }

    fn current_value(&self, instance: &Value) -> Result<Value, InitializeError> {
        if !self.property.can_read() {
            return Err(InitializeError::NoAccessor {
                property: self.property.name().to_owned(),
                operation: "read",
            });
        }
        self.property
            .accessor()
            .read(instance)
            .map_err(|e| InitializeError::AccessorFailed {
                property: self.property.name().to_owned(),
                operation: "read",
                source: e.into(),
            })
    }

    fn set_value(&self, instance: &mut Value, value: Value) -> Result<(), InitializeError> {
        if !self.property.can_write() {
            return Err(InitializeError::NoAccessor {
                property: self.property.name().to_owned(),
                operation: "write",
            });
        }
        self.property
            .accessor()
            .write(instance, value)
            .map_err(|e| InitializeError::AccessorFailed {
                property: self.property.name().to_owned(),
                operation: "write",
                source: e.into(),
            })
    }
}

/// An item of the parent's collection value.
///
/// Items cannot be read or written through the node: general collections
/// are neither index addressable nor ordered, so whoever owns the
/// collection stores the generated item.
#[derive(Debug)]
pub struct CollectionItemNode<'a> {
    parent: &'a PathNode<'a>,
    context: PathContext,
    index: usize,
}

impl<'a> CollectionItemNode<'a> {
    /// `data` describes the item type, which follows from the collection's
    /// declared item type rather than from any instance.
    pub fn new(parent: &'a PathNode<'a>, index: usize, data: CalculatedNodeData) -> Self {
        let path = parent.path().sub_path_traversing_array(index);
        Self {
            parent,
            context: PathContext::with_calculated_node_data(path, data),
            index,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
