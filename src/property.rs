// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::types::Type;
use crate::value::Value;

/// Reads and writes one property of an instance.
///
/// This is the only way the traversal touches instances, so the core does
/// not depend on how properties are stored. Accessors live in class
/// definitions, which may be shared between threads.
pub trait PropertyAccessor: Send + Sync {
    fn read(&self, instance: &Value) -> Result<Value>;
    fn write(&self, instance: &mut Value, value: Value) -> Result<()>;
}

/// Accessor for a plain field: the object entry keyed by the field name.
#[derive(Clone, Debug)]
pub struct FieldAccessor {
    name: Arc<str>,
}

impl FieldAccessor {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}

impl PropertyAccessor for FieldAccessor {
    fn read(&self, instance: &Value) -> Result<Value> {
        match instance {
            Value::Object(fields) => Ok(fields
                .get(&Value::from(&*self.name))
                .cloned()
                .unwrap_or(Value::Null)),
            _ => bail!("cannot read field {} of non-object `{instance}`", self.name),
        }
    }

    fn write(&self, instance: &mut Value, value: Value) -> Result<()> {
        if let Value::Object(fields) = instance {
            Rc::make_mut(fields).insert(Value::from(&*self.name), value);
            return Ok(());
        }
        bail!("cannot write field {} of non-object `{instance}`", self.name)
    }
}

/// Description of a property as reported by introspection.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: Arc<str>,
    declaring_class: Arc<str>,
    declared_type: Type,
    accessor: Arc<dyn PropertyAccessor>,
    readable: bool,
    writable: bool,
}

impl PropertyDescriptor {
    /// A readable and writable property backed by a [`FieldAccessor`].
    pub fn field(name: &str, declared_type: Type) -> Self {
        Self::with_accessor(name, declared_type, Arc::new(FieldAccessor::new(name)))
    }

    pub fn with_accessor(
        name: &str,
        declared_type: Type,
        accessor: Arc<dyn PropertyAccessor>,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_class: "".into(),
            declared_type,
            accessor,
            readable: true,
            writable: true,
        }
    }

    /// Drop the write capability, as for a getter-only property.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Drop the read capability, as for a setter-only property.
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    pub(crate) fn declared_in(mut self, class: Arc<str>) -> Self {
        self.declaring_class = class;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    pub fn declared_type(&self) -> &Type {
        &self.declared_type
    }

    pub fn accessor(&self) -> &dyn PropertyAccessor {
        self.accessor.as_ref()
    }

    pub fn can_read(&self) -> bool {
        self.readable
    }

    pub fn can_write(&self) -> bool {
        self.writable
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("declaring_class", &self.declaring_class)
            .field("declared_type", &self.declared_type)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .finish()
    }
}
