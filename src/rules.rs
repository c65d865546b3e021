// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Ordered predicate/generator pairs.
//!
//! Rules are evaluated in declaration order and the first one whose
//! predicate accepts the node wins. Predicates only get shared references,
//! so evaluating them cannot change node or path state.

pub mod predicates;

use core::fmt;
use std::rc::Rc;

use crate::generator::Generator;
use crate::node::PathNode;
use crate::value::Value;

/// Decides whether a rule applies to `node` inside `instance`.
pub type Predicate = Box<dyn Fn(&Value, &PathNode<'_>) -> bool>;

pub struct Rule {
    predicate: Predicate,
    generator: Rc<dyn Generator>,
}

impl Rule {
    pub fn new<P, G>(predicate: P, generator: G) -> Self
    where
        P: Fn(&Value, &PathNode<'_>) -> bool + 'static,
        G: Generator + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            generator: Rc::new(generator),
        }
    }

    /// Build a rule around a generator that is shared with other rules.
    pub fn with_shared_generator<P>(predicate: P, generator: Rc<dyn Generator>) -> Self
    where
        P: Fn(&Value, &PathNode<'_>) -> bool + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            generator,
        }
    }

    pub fn applies(&self, instance: &Value, node: &PathNode<'_>) -> bool {
        (self.predicate)(instance, node)
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

/// Rule set of one traversal. Must be complete before traversal starts.
#[derive(Debug, Default)]
pub struct Rules {
    rules: Vec<Rule>,
}

impl Rules {
    pub fn new() -> Self {
        Self { rules: vec![] }
    }

    /// Append a rule, builder style.
    pub fn rule<P, G>(mut self, predicate: P, generator: G) -> Self
    where
        P: Fn(&Value, &PathNode<'_>) -> bool + 'static,
        G: Generator + 'static,
    {
        self.rules.push(Rule::new(predicate, generator));
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

impl From<Vec<Rule>> for Rules {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

/// First-match rule selection.
pub struct FindFirstApplicableRule;

impl FindFirstApplicableRule {
    /// Generator of the first rule accepting `(instance, node)`, or `None`
    /// when no rule applies. What to do then is up to the caller.
    pub fn generator_from_first_applicable_rule<'r>(
        rules: &'r Rules,
        instance: &Value,
        node: &PathNode<'_>,
    ) -> Option<&'r dyn Generator> {
        rules
            .iter()
            .find(|rule| rule.applies(instance, node))
            .map(Rule::generator)
    }
}
