// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Common rule predicates and combinators.

use crate::node::PathNode;
use crate::rules::Predicate;
use crate::types::Type;
use crate::value::Value;

pub fn always() -> Predicate {
    Box::new(|_: &Value, _: &PathNode<'_>| true)
}

pub fn never() -> Predicate {
    Box::new(|_: &Value, _: &PathNode<'_>| false)
}

/// The node's path, in string form, contains `text`.
pub fn path_contains(text: &str) -> Predicate {
    let text = text.to_owned();
    Box::new(move |_: &Value, node: &PathNode<'_>| node.path().contains(&text))
}

pub fn path_equals(path: &str) -> Predicate {
    let path = path.to_owned();
    Box::new(move |_: &Value, node: &PathNode<'_>| node.path().to_string() == path)
}

/// See [`crate::Path::matches_pattern`].
pub fn path_matches(pattern: &str) -> Predicate {
    let pattern = pattern.to_owned();
    Box::new(move |_: &Value, node: &PathNode<'_>| node.path().matches_pattern(&pattern))
}

/// The node is a property called `name`, at any depth.
pub fn property_named(name: &str) -> Predicate {
    let name = name.to_owned();
    Box::new(move |_: &Value, node: &PathNode<'_>| node.name() == Some(name.as_str()))
}

/// The node's resolved type equals `ty`.
pub fn type_is(ty: Type) -> Predicate {
    Box::new(move |_: &Value, node: &PathNode<'_>| {
        node.calculated_node_data()
            .is_some_and(|data| data.resolved_type() == &ty)
    })
}

/// The erasure of the node's resolved type equals the erasure of `ty`.
pub fn raw_type_is(ty: Type) -> Predicate {
    let raw = ty.erasure();
    Box::new(move |_: &Value, node: &PathNode<'_>| {
        node.calculated_node_data()
            .is_some_and(|data| data.raw_type() == raw)
    })
}

/// The node is a property declared in class `class`. Inherited properties
/// report the class that declares them, not the subclass.
pub fn declared_in_class(class: &str) -> Predicate {
    let class = class.to_owned();
    Box::new(move |_: &Value, node: &PathNode<'_>| {
        node.declaring_class() == Some(class.as_str())
    })
}

/// The node is an item of a collection.
pub fn collection_item() -> Predicate {
    Box::new(|_: &Value, node: &PathNode<'_>| matches!(node, PathNode::CollectionItem(_)))
}

pub fn and(left: Predicate, right: Predicate) -> Predicate {
    Box::new(move |instance: &Value, node: &PathNode<'_>| {
        left(instance, node) && right(instance, node)
    })
}

pub fn or(left: Predicate, right: Predicate) -> Predicate {
    Box::new(move |instance: &Value, node: &PathNode<'_>| {
        left(instance, node) || right(instance, node)
    })
}

pub fn not(predicate: Predicate) -> Predicate {
    Box::new(move |instance: &Value, node: &PathNode<'_>| !predicate(instance, node))
}
