// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Type-variable resolution.
//!
//! Every node carries the assignment of type variables that is valid at its
//! position in the graph. For a child property the declared type is resolved
//! against the parent's assignment, and a new assignment is derived from the
//! resolved type for the child's own children. For example with
//!
//! ```text
//! class Box<T>      { T value; }
//! class Holder      { Box<Pair<String, Integer>> boxed; }
//! class Pair<A, B>  { A left; B right; }
//! ```
//!
//! the node `boxed` resolves to `Box<Pair<String, Integer>>` and hands down
//! `{Box.T: Pair<String, Integer>}`; `boxed.value` then resolves to
//! `Pair<String, Integer>` and hands down `{Pair.A: String, Pair.B: Integer}`.
//!
//! A variable without an assignment (raw usage) resolves to the erasure of
//! its bound.

use core::fmt;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::context::CalculatedNodeData;
use crate::property::PropertyDescriptor;
use crate::registry::Introspector;
use crate::types::{Type, TypeVariable};

/// Immutable mapping from type variables to the types they stand for.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TypeVariableAssignment {
    bindings: Rc<BTreeMap<TypeVariable, Type>>,
}

impl TypeVariableAssignment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &TypeVariable) -> Option<&Type> {
        self.bindings.get(variable)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeVariable, &Type)> {
        self.bindings.iter()
    }
}

impl FromIterator<(TypeVariable, Type)> for TypeVariableAssignment {
    fn from_iter<I: IntoIterator<Item = (TypeVariable, Type)>>(iter: I) -> Self {
        Self {
            bindings: Rc::new(iter.into_iter().collect()),
        }
    }
}

impl fmt::Debug for TypeVariableAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.bindings
                    .iter()
                    .map(|(k, v)| (format!("{}.{}", k.declared_in(), k.name()), v.to_string())),
            )
            .finish()
    }
}

/// Replace the type variables in `ty` with their assigned types.
pub fn substitute_type_variables(ty: &Type, assignment: &TypeVariableAssignment) -> Type {
    match ty {
        Type::Variable(variable) => match assignment.get(variable) {
            Some(assigned) => assigned.clone(),
            None => variable.bound().erasure(),
        },
        Type::Class { name, arguments } => Type::Class {
            name: name.clone(),
            arguments: arguments
                .iter()
                .map(|a| substitute_type_variables(a, assignment))
                .collect(),
        },
        Type::Array(item) => Type::Array(Box::new(substitute_type_variables(item, assignment))),
        Type::Map(key, value) => Type::Map(
            Box::new(substitute_type_variables(key, assignment)),
            Box::new(substitute_type_variables(value, assignment)),
        ),
        other => other.clone(),
    }
}

/// Assignment seen by the properties of a value of type `ty`.
///
/// The class's own type parameters are bound to `ty`'s arguments, then the
/// superclass chain is walked so that properties declared in a generic base
/// class resolve too. Unknown classes and raw usages contribute nothing.
pub fn type_variable_assignment_for(
    ty: &Type,
    introspector: &dyn Introspector,
) -> TypeVariableAssignment {
    let mut bindings: BTreeMap<TypeVariable, Type> = BTreeMap::new();
    let mut current = ty.clone();
    let mut visited: Vec<Arc<str>> = vec![];

    while let Type::Class { name, arguments } = current {
        if visited.contains(&name) {
            break;
        }
        let Some(class) = introspector.class(&name) else {
            break;
        };

        // Raw usage leaves the parameters unbound.
        if arguments.len() == class.type_parameters().len() {
            for (parameter, argument) in class.type_parameters().iter().zip(arguments) {
                bindings.insert(parameter.clone(), argument);
            }
        }
        visited.push(name);

        let Some(superclass) = class.superclass() else {
            break;
        };
        let partial = TypeVariableAssignment {
            bindings: Rc::new(bindings.clone()),
        };
        current = substitute_type_variables(superclass, &partial);
    }

    TypeVariableAssignment {
        bindings: Rc::new(bindings),
    }
}

/// Resolved type and child assignment for a declared type seen under
/// `assignment`.
pub fn calculate_node_data(
    declared_type: &Type,
    assignment: &TypeVariableAssignment,
    introspector: &dyn Introspector,
) -> CalculatedNodeData {
    let resolved = substitute_type_variables(declared_type, assignment);
    let child_assignment = type_variable_assignment_for(&resolved, introspector);
    CalculatedNodeData::new(resolved, child_assignment)
}

/// Concrete type of `property` under the parent's assignment.
pub fn resolve_property_type(
    property: &PropertyDescriptor,
    assignment: &TypeVariableAssignment,
) -> Type {
    substitute_type_variables(property.declared_type(), assignment)
}

/// Assignment to hand to the children of `property`.
pub fn recalculate_type_variable_assignment(
    property: &PropertyDescriptor,
    assignment: &TypeVariableAssignment,
    introspector: &dyn Introspector,
) -> TypeVariableAssignment {
    let resolved = resolve_property_type(property, assignment);
    type_variable_assignment_for(&resolved, introspector)
}

/// Node data for the items of an array or the values of a map. `None` for
/// types that have no items.
pub fn item_node_data(
    collection_type: &Type,
    introspector: &dyn Introspector,
) -> Option<CalculatedNodeData> {
    let item = match collection_type {
        Type::Array(item) => item.as_ref(),
        Type::Map(_, value) => value.as_ref(),
        _ => return None,
    };
    // The collection type is already resolved, so no outer assignment applies.
    Some(calculate_node_data(
        item,
        &TypeVariableAssignment::empty(),
        introspector,
    ))
}
