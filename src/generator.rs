// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;

use crate::node::PathNode;
use crate::value::Value;

/// Produces the value for a node.
///
/// `instance` is the object that contains the node, i.e. the value the
/// generated value is about to be written into. Closures of the shape
/// `Fn(&PathNode, &Value) -> Result<Value>` are generators too.
pub trait Generator {
    fn generate(&self, node: &PathNode<'_>, instance: &Value) -> Result<Value>;
}

impl<F> Generator for F
where
    F: Fn(&PathNode<'_>, &Value) -> Result<Value>,
{
    fn generate(&self, node: &PathNode<'_>, instance: &Value) -> Result<Value> {
        self(node, instance)
    }
}

/// Always produces the same value.
#[derive(Clone, Debug)]
pub struct ConstantGenerator {
    value: Value,
}

impl ConstantGenerator {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Generator for ConstantGenerator {
    fn generate(&self, _node: &PathNode<'_>, _instance: &Value) -> Result<Value> {
        Ok(self.value.clone())
    }
}

/// Shorthand for [`ConstantGenerator::new`].
pub fn constant(value: impl Into<Value>) -> ConstantGenerator {
    ConstantGenerator::new(value.into())
}
