// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use crate::error::InitializeError;
use crate::property::PropertyDescriptor;
use crate::types::{ClassDef, Type};
use crate::value::Value;

/// Faults raised while registering class definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Class '{0}' is already registered")]
    DuplicateClass(String),

    #[error("Class name '{0}' is invalid (empty or whitespace-only)")]
    InvalidClassName(String),
}

/// Answers "which properties does this type have".
///
/// Implementations must be pure queries.
pub trait Introspector {
    /// Definition of a class by name.
    fn class(&self, name: &str) -> Option<Arc<ClassDef>>;

    /// Properties of `ty`, inherited ones included. Types that are not
    /// classes have no properties.
    fn properties_of(&self, ty: &Type) -> Result<Vec<PropertyDescriptor>, InitializeError>;

    /// Fresh instance of a class with every property at its default value.
    /// Only classes can be instantiated.
    fn instantiate(&self, ty: &Type) -> Result<Value, InitializeError> {
        if ty.class_name().is_none() {
            return Err(InitializeError::NotAClass(ty.to_string()));
        }
        let mut fields = BTreeMap::new();
        for property in self.properties_of(ty)? {
            fields.insert(
                Value::from(property.name()),
                property.declared_type().default_value(),
            );
        }
        Ok(Value::from(fields))
    }
}

/// Registry of class definitions; the default [`Introspector`].
///
/// Classes can be registered through a shared reference, so one registry
/// can be filled and queried from several threads.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    classes: DashMap<Arc<str>, Arc<ClassDef>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class. Names are unique; a class cannot be redefined.
    pub fn register(&self, class: ClassDef) -> Result<(), RegistryError> {
        if class.name().trim().is_empty() {
            return Err(RegistryError::InvalidClassName(class.name().to_owned()));
        }
        match self.classes.entry(class.name().into()) {
            Entry::Occupied(_) => {
                Err(RegistryError::DuplicateClass(class.name().to_owned()))
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(class));
                Ok(())
            }
        }
    }

    /// Register a class, returning the registry for chaining.
    pub fn with(self, class: ClassDef) -> Result<Self, RegistryError> {
        self.register(class)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Names of the registered classes, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.iter().map(|e| e.key().to_string()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn require(&self, name: &str) -> Result<Arc<ClassDef>, InitializeError> {
        self.class(name)
            .ok_or_else(|| InitializeError::UnknownClass(name.to_owned()))
    }
}

impl Introspector for ClassRegistry {
    fn class(&self, name: &str) -> Option<Arc<ClassDef>> {
        self.classes.get(name).map(|entry| Arc::clone(entry.value()))
    }

    fn properties_of(&self, ty: &Type) -> Result<Vec<PropertyDescriptor>, InitializeError> {
        let Some(name) = ty.class_name() else {
            return Ok(vec![]);
        };

        // Collect the hierarchy from the most derived class upwards.
        let mut hierarchy = vec![self.require(name)?];
        let mut visited: Vec<String> = vec![name.to_owned()];
        while let Some(superclass) = hierarchy.last().and_then(|c| c.superclass().cloned()) {
            let Some(super_name) = superclass.class_name() else {
                break;
            };
            // Malformed hierarchies must not loop forever.
            if visited.iter().any(|v| v == super_name) {
                break;
            }
            hierarchy.push(self.require(super_name)?);
            visited.push(super_name.to_owned());
        }

        // Base class properties first; a redeclared property replaces the
        // inherited one in place.
        let mut properties: Vec<PropertyDescriptor> = vec![];
        for class in hierarchy.iter().rev() {
            for property in class.declared_properties() {
                match properties.iter_mut().find(|p| p.name() == property.name()) {
                    Some(existing) => *existing = property.clone(),
                    None => properties.push(property.clone()),
                }
            }
        }
        Ok(properties)
    }
}
