// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod config;
mod context;
mod error;
mod generator;
mod initializer;
mod node;
mod number;
mod path;
mod property;
mod registry;
pub mod resolve;
pub mod rules;
mod types;
mod value;

pub use config::{InitializerConfig, UnmatchedPolicy};
pub use context::{CalculatedNodeData, PathContext};
pub use error::InitializeError;
pub use generator::{constant, ConstantGenerator, Generator};
pub use initializer::Initializer;
pub use node::{CollectionItemNode, PathNode, PropertyNode, RootNode};
pub use number::Number;
pub use path::{Path, PathStep};
pub use property::{FieldAccessor, PropertyAccessor, PropertyDescriptor};
pub use registry::{ClassRegistry, Introspector, RegistryError};
pub use resolve::TypeVariableAssignment;
pub use rules::{predicates, FindFirstApplicableRule, Predicate, Rule, Rules};
pub use types::{ClassDef, Type, TypeVariable};
pub use value::Value;
