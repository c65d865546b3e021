// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Type model standing in for runtime reflection.
//!
//! Classes are described by [`ClassDef`]s registered in a
//! [`crate::ClassRegistry`]. A declared property type may mention the type
//! variables of its declaring class; those are resolved while the graph is
//! traversed (see [`crate::resolve`]).

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::property::PropertyDescriptor;
use crate::value::Value;

/// A possibly generic type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Type {
    /// Universal bound of unconstrained type variables.
    Any,
    Boolean,
    Integer,
    Number,
    String,
    /// A class, raw when `arguments` is empty.
    Class {
        name: Arc<str>,
        arguments: Vec<Type>,
    },
    Variable(TypeVariable),
    Array(Box<Type>),
    Map(Box<Type>, Box<Type>),
}

impl Type {
    pub fn class(name: &str) -> Self {
        Type::Class {
            name: name.into(),
            arguments: vec![],
        }
    }

    pub fn parameterized(name: &str, arguments: Vec<Type>) -> Self {
        Type::Class {
            name: name.into(),
            arguments,
        }
    }

    pub fn array_of(item: Type) -> Self {
        Type::Array(Box::new(item))
    }

    pub fn map_of(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Type::Boolean | Type::Integer | Type::Number | Type::String
        )
    }

    /// Whether the type still mentions a type variable.
    pub fn has_type_variables(&self) -> bool {
        match self {
            Type::Variable(_) => true,
            Type::Class { arguments, .. } => arguments.iter().any(Type::has_type_variables),
            Type::Array(item) => item.has_type_variables(),
            Type::Map(k, v) => k.has_type_variables() || v.has_type_variables(),
            _ => false,
        }
    }

    /// Drops type arguments; a variable erases to the erasure of its bound.
    pub fn erasure(&self) -> Type {
        match self {
            Type::Class { name, .. } => Type::Class {
                name: name.clone(),
                arguments: vec![],
            },
            Type::Variable(v) => v.bound().erasure(),
            Type::Array(item) => Type::Array(Box::new(item.erasure())),
            Type::Map(_, _) => Type::map_of(Type::Any, Type::Any),
            other => other.clone(),
        }
    }

    /// The value an uninitialized field of this type holds.
    pub fn default_value(&self) -> Value {
        match self {
            Type::Boolean => Value::Bool(false),
            Type::Integer => Value::from(0i64),
            Type::Number => Value::from(0.0),
            _ => Value::Null,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => write!(f, "Object"),
            Type::Boolean => write!(f, "Boolean"),
            Type::Integer => write!(f, "Integer"),
            Type::Number => write!(f, "Number"),
            Type::String => write!(f, "String"),
            Type::Class { name, arguments } if arguments.is_empty() => write!(f, "{name}"),
            Type::Class { name, arguments } => {
                let args: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{name}<{}>", args.join(", "))
            }
            Type::Variable(v) => write!(f, "{}", v.name()),
            Type::Array(item) => write!(f, "{item}[]"),
            Type::Map(k, v) => write!(f, "Map<{k}, {v}>"),
        }
    }
}

/// A type parameter of a generic class.
///
/// Two variables are the same when they have the same name and are declared
/// by the same class; the bound is carried along for raw-typed usages.
#[derive(Clone, Debug, Serialize)]
pub struct TypeVariable {
    declared_in: Arc<str>,
    name: Arc<str>,
    bound: Arc<Type>,
}

impl TypeVariable {
    pub fn new(declared_in: &str, name: &str, bound: Type) -> Self {
        Self {
            declared_in: declared_in.into(),
            name: name.into(),
            bound: Arc::new(bound),
        }
    }

    pub fn declared_in(&self) -> &str {
        &self.declared_in
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bound(&self) -> &Type {
        &self.bound
    }
}

impl PartialEq for TypeVariable {
    fn eq(&self, other: &Self) -> bool {
        self.declared_in == other.declared_in && self.name == other.name
    }
}

impl Eq for TypeVariable {}

impl PartialOrd for TypeVariable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeVariable {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.declared_in, &self.name).cmp(&(&other.declared_in, &other.name))
    }
}

impl Hash for TypeVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declared_in.hash(state);
        self.name.hash(state);
    }
}

/// Definition of a class: its type parameters, superclass and declared
/// properties.
#[derive(Clone, Debug)]
pub struct ClassDef {
    name: Arc<str>,
    type_parameters: Vec<TypeVariable>,
    superclass: Option<Type>,
    properties: Vec<PropertyDescriptor>,
}

impl ClassDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            type_parameters: vec![],
            superclass: None,
            properties: vec![],
        }
    }

    /// Declare a type parameter bounded by `Object`.
    pub fn with_type_parameter(self, name: &str) -> Self {
        self.with_bounded_type_parameter(name, Type::Any)
    }

    pub fn with_bounded_type_parameter(mut self, name: &str, bound: Type) -> Self {
        self.type_parameters
            .push(TypeVariable::new(&self.name, name, bound));
        self
    }

    /// Set the superclass. It may reference this class's type variables,
    /// e.g. `class Named<T> extends Box<T>`.
    pub fn with_superclass(mut self, superclass: Type) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Declare a property backed by a plain field.
    pub fn with_property(self, name: &str, declared_type: Type) -> Self {
        let property = PropertyDescriptor::field(name, declared_type);
        self.with_property_descriptor(property)
    }

    /// Declare a property; its declaring class is set to this class.
    pub fn with_property_descriptor(mut self, property: PropertyDescriptor) -> Self {
        self.properties
            .push(property.declared_in(self.name.clone()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_parameters(&self) -> &[TypeVariable] {
        &self.type_parameters
    }

    /// Look up one of this class's type variables by name.
    pub fn type_variable(&self, name: &str) -> Result<TypeVariable> {
        self.type_parameters
            .iter()
            .find(|v| v.name() == name)
            .cloned()
            .ok_or_else(|| anyhow!("class `{}` has no type parameter `{name}`", self.name))
    }

    /// Shorthand for `Type::Variable(self.type_variable(name)?)`.
    pub fn var(&self, name: &str) -> Result<Type> {
        Ok(Type::Variable(self.type_variable(name)?))
    }

    pub fn superclass(&self) -> Option<&Type> {
        self.superclass.as_ref()
    }

    /// Properties declared directly on this class.
    pub fn declared_properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}
