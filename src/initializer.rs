// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::{debug, enabled, trace, Level};

use crate::config::{InitializerConfig, UnmatchedPolicy};
use crate::context::CalculatedNodeData;
use crate::error::InitializeError;
use crate::node::{CollectionItemNode, PathNode, PropertyNode, RootNode};
use crate::registry::Introspector;
use crate::resolve;
use crate::rules::Rules;
use crate::types::Type;
use crate::value::Value;

/// Populates object graphs by asking a rule set, node by node, for a
/// generator.
///
/// Traversal is depth first. For every node the first applicable rule's
/// generator produces the value. Nodes no rule applies to are descended
/// into when they are classes (or arrays, if a collection size is
/// configured) and otherwise handled by the [`UnmatchedPolicy`]. A class type
/// is never descended into while the same type, type arguments included, is
/// already being populated further up the branch. That keeps
/// self-referential types finite; `Box<Box<String>>` still nests.
pub struct Initializer {
    introspector: Rc<dyn Introspector>,
    rules: Rules,
    config: InitializerConfig,
}

impl Initializer {
    pub fn new(introspector: impl Introspector + 'static, rules: Rules) -> Self {
        Self {
            introspector: Rc::new(introspector),
            rules,
            config: InitializerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: InitializerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &InitializerConfig {
        &self.config
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.config.max_depth = max_depth;
    }

    pub fn set_unmatched_policy(&mut self, policy: UnmatchedPolicy) {
        self.config.unmatched = policy;
    }

    pub fn set_collection_size(&mut self, size: Option<usize>) {
        self.config.collection_size = size;
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn introspector(&self) -> &dyn Introspector {
        self.introspector.as_ref()
    }

    /// Create an instance of class `ty` and populate it. Collections are
    /// created with [`Initializer::collection`].
    pub fn instance(&self, ty: &Type) -> Result<Value> {
        let instance = self.introspector.instantiate(ty)?;
        self.populate(ty, instance)
    }

    /// Populate an instance of class `ty` supplied by the caller. Properties
    /// no rule applies to keep the supplied values (under the default
    /// policy), and nested objects the instance already holds are populated
    /// in place.
    pub fn populate(&self, ty: &Type, mut instance: Value) -> Result<Value> {
        if ty.class_name().is_none() {
            return Err(InitializeError::NotAClass(ty.to_string()).into());
        }
        let root = PathNode::Root(RootNode::for_type(
            &self.rules,
            ty,
            self.introspector.as_ref(),
        ));
        let mut ancestors = vec![ty.clone()];

        self.populate_properties(&root, &mut instance, &mut ancestors)?;

        if enabled!(Level::DEBUG) {
            let json = instance.to_json_str()?;
            debug!(root_type = %ty, "initialized instance:\n{json}");
        }
        Ok(instance)
    }

    /// Create a collection of `size` items of `item_type`.
    pub fn collection(&self, item_type: &Type, size: usize) -> Result<Value> {
        let collection_type = Type::array_of(item_type.clone());
        let root = PathNode::Root(RootNode::for_type(
            &self.rules,
            &collection_type,
            self.introspector.as_ref(),
        ));

        let items = self.populate_items(&root, size, &mut vec![])?;

        if enabled!(Level::DEBUG) {
            let json = items.to_json_str()?;
            debug!(root_type = %collection_type, "initialized collection:\n{json}");
        }
        Ok(items)
    }

    fn node_data<'n>(node: &'n PathNode<'_>) -> Result<&'n CalculatedNodeData, InitializeError> {
        node.calculated_node_data()
            .ok_or_else(|| InitializeError::MissingCalculatedNodeData {
                path: node.path().to_string(),
            })
    }

    fn check_depth(&self, node: &PathNode<'_>) -> Result<(), InitializeError> {
        if node.depth() > self.config.max_depth {
            return Err(InitializeError::DepthLimitExceeded {
                path: node.path().to_string(),
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    fn populate_properties(
        &self,
        node: &PathNode<'_>,
        instance: &mut Value,
        ancestors: &mut Vec<Type>,
    ) -> Result<()> {
        let properties = self
            .introspector
            .properties_of(Self::node_data(node)?.resolved_type())?;

        for property in properties {
            if !property.can_write() {
                trace!(property = property.name(), "skipping read-only property");
                continue;
            }
            let child = PathNode::Property(PropertyNode::new(
                node,
                property,
                self.introspector.as_ref(),
            )?);
            self.check_depth(&child)?;

            if let Some(value) = self.produce(&child, instance, ancestors)? {
                child.set_value(instance, value)?;
            }
        }
        Ok(())
    }

    fn populate_items(
        &self,
        node: &PathNode<'_>,
        size: usize,
        ancestors: &mut Vec<Type>,
    ) -> Result<Value> {
        let collection_type = Self::node_data(node)?.resolved_type();
        let item_data = resolve::item_node_data(collection_type, self.introspector.as_ref())
            .with_context(|| format!("type {collection_type} has no items"))?;

        let mut items = Value::new_array();
        for index in 0..size {
            let item = PathNode::CollectionItem(CollectionItemNode::new(
                node,
                index,
                item_data.clone(),
            ));
            self.check_depth(&item)?;

            // Items cannot be written through their node; the collection
            // built here is theirs.
            let value = match self.produce(&item, &items, ancestors)? {
                Some(value) => value,
                None => item_data.resolved_type().default_value(),
            };
            items.as_array_mut()?.push(value);
        }
        Ok(items)
    }

    /// Value for `node` inside `instance`, or `None` to leave it untouched.
    fn produce(
        &self,
        node: &PathNode<'_>,
        instance: &Value,
        ancestors: &mut Vec<Type>,
    ) -> Result<Option<Value>> {
        let resolved_type = Self::node_data(node)?.resolved_type();

        if let Some(generator) = node.generator_from_first_applicable_rule(instance) {
            trace!(path = %node.path(), ty = %resolved_type, "rule matched");
            let value = generator
                .generate(node, instance)
                .with_context(|| format!("generator failed at path '{}'", node.path()))?;
            return Ok(Some(value));
        }

        match resolved_type {
            Type::Class { name, .. }
                if self.config.descend_into_classes && self.introspector.class(name).is_some() =>
            {
                if ancestors.contains(resolved_type) {
                    debug!(path = %node.path(), ty = %resolved_type, "not descending into cyclic type");
                    return Ok(None);
                }
                trace!(path = %node.path(), ty = %resolved_type, "descending");

                // An object already held by the instance is populated in place.
                let mut nested = match node.current_value(instance) {
                    Ok(current @ Value::Object(_)) => current,
                    _ => self.introspector.instantiate(resolved_type)?,
                };
                ancestors.push(resolved_type.clone());
                let populated = self.populate_properties(node, &mut nested, ancestors);
                ancestors.pop();
                populated?;
                Ok(Some(nested))
            }
            Type::Array(_) => match self.config.collection_size {
                Some(size) => {
                    trace!(path = %node.path(), ty = %resolved_type, size, "generating items");
                    Ok(Some(self.populate_items(node, size, ancestors)?))
                }
                None => Ok(self.unmatched(node)?),
            },
            _ => Ok(self.unmatched(node)?),
        }
    }

    fn unmatched(&self, node: &PathNode<'_>) -> Result<Option<Value>, InitializeError> {
        match self.config.unmatched {
            UnmatchedPolicy::LeaveDefault => {
                trace!(path = %node.path(), "no rule matched");
                Ok(None)
            }
            UnmatchedPolicy::Fail => Err(InitializeError::NoApplicableRule {
                path: node.path().to_string(),
            }),
        }
    }
}
