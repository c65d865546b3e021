// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// What to do with a node no rule applies to and that cannot be descended
/// into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Keep whatever value the containing instance already holds.
    #[default]
    LeaveDefault,
    /// Abort the traversal with [`crate::InitializeError::NoApplicableRule`].
    Fail,
}

/// Traversal settings of an [`crate::Initializer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitializerConfig {
    /// Deepest path (in steps) the traversal may create.
    pub max_depth: usize,
    pub unmatched: UnmatchedPolicy,
    /// Instantiate and populate class-typed nodes no rule applies to.
    pub descend_into_classes: bool,
    /// Number of items to generate for array-typed nodes no rule applies
    /// to. `None` leaves such nodes to the unmatched policy.
    pub collection_size: Option<usize>,
}

impl Default for InitializerConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            unmatched: UnmatchedPolicy::LeaveDefault,
            descend_into_classes: true,
            collection_size: None,
        }
    }
}

impl InitializerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_str(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
