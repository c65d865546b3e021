// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Location of a node relative to the traversal root.
//!
//! A [`Path`] is an immutable linked list of [`PathStep`]s. Extending a path
//! allocates one link and shares the whole prefix with the receiver, so the
//! receiver is never modified and sibling paths are cheap.
//!
//! The string form joins property names with `.` and renders array and map
//! steps in brackets: `address.city`, `items[2].name`, `labels[color]`. Rule
//! predicates match on it, either by substring ([`Path::contains`]) or by
//! component pattern ([`Path::matches_pattern`]).

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::Rc;

/// One traversal step.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathStep {
    /// Into a property of an object.
    Property(Rc<str>),
    /// Into an item of an array or collection.
    Array(usize),
    /// Into the value stored under a map key.
    Map(Rc<str>),
}

impl PathStep {
    /// The step as a single pattern component.
    fn component(&self) -> String {
        match self {
            PathStep::Property(name) => name.to_string(),
            PathStep::Array(index) => format!("[{index}]"),
            PathStep::Map(key) => format!("[{}]", escape_key(key)),
        }
    }
}

/// Backslash-escape the characters that delimit components, so that a key
/// such as `a.b` stays a single component: `[a\.b]`.
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        if matches!(c, '\\' | '.' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug)]
struct PathLink {
    parent: Path,
    step: PathStep,
    depth: usize,
}

/// Immutable sequence of steps from the root to a node.
#[derive(Clone, Default)]
pub struct Path {
    last: Option<Rc<PathLink>>,
}

impl Path {
    /// The empty path, identifying the root.
    pub fn new() -> Self {
        Self { last: None }
    }

    fn push(&self, step: PathStep) -> Path {
        Path {
            last: Some(Rc::new(PathLink {
                parent: self.clone(),
                step,
                depth: self.depth() + 1,
            })),
        }
    }

    pub fn sub_path_traversing_property(&self, name: &str) -> Path {
        self.push(PathStep::Property(name.into()))
    }

    pub fn sub_path_traversing_array(&self, index: usize) -> Path {
        self.push(PathStep::Array(index))
    }

    pub fn sub_path_traversing_map(&self, key: &str) -> Path {
        self.push(PathStep::Map(key.into()))
    }

    pub fn is_root(&self) -> bool {
        self.last.is_none()
    }

    /// Number of steps.
    pub fn depth(&self) -> usize {
        self.last.as_ref().map_or(0, |link| link.depth)
    }

    pub fn last_step(&self) -> Option<&PathStep> {
        self.last.as_ref().map(|link| &link.step)
    }

    /// The path without its last step; `None` for the root path.
    pub fn parent(&self) -> Option<&Path> {
        self.last.as_ref().map(|link| &link.parent)
    }

    /// Steps in traversal order, root first.
    pub fn steps(&self) -> Vec<PathStep> {
        let mut steps = Vec::with_capacity(self.depth());
        let mut current = self;
        while let Some(link) = &current.last {
            steps.push(link.step.clone());
            current = &link.parent;
        }
        steps.reverse();
        steps
    }

    /// Pattern components: property names, `[index]` and `[key]`.
    pub fn components(&self) -> Vec<String> {
        self.steps().iter().map(PathStep::component).collect()
    }

    /// Substring test on the string form.
    pub fn contains(&self, text: &str) -> bool {
        self.to_string().contains(text)
    }

    /// Match against a component pattern.
    ///
    /// `*` matches any single component and `[*]` any array or map step. A
    /// pattern also matches every path that extends a matching path, e.g.
    /// `address` matches `address.city`.
    pub fn matches_pattern(&self, pattern: &str) -> bool {
        let components = self.components();
        let components: Vec<&str> = components.iter().map(String::as_str).collect();
        matches_path_pattern(&components, &split_pattern(pattern))
    }
}

/// Split a pattern into components on `.` and around `[..]`. A backslash
/// escapes the next character, matching how map keys are rendered.
fn split_pattern(pattern: &str) -> Vec<&str> {
    let mut components = vec![];
    let mut start = 0;
    let mut in_brackets = false;
    let mut chars = pattern.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '.' if !in_brackets => {
                if i > start {
                    components.push(&pattern[start..i]);
                }
                start = i + 1;
            }
            '[' if !in_brackets => {
                if i > start {
                    components.push(&pattern[start..i]);
                }
                start = i;
                in_brackets = true;
            }
            ']' if in_brackets => {
                components.push(&pattern[start..=i]);
                start = i + 1;
                in_brackets = false;
            }
            _ => {}
        }
    }
    if start < pattern.len() {
        components.push(&pattern[start..]);
    }
    components
}

fn component_matches(pattern: &str, component: &str) -> bool {
    match pattern {
        "*" => !component.is_empty(),
        "[*]" => component.starts_with('['),
        _ => pattern == component,
    }
}

fn is_wildcard(pattern: &str) -> bool {
    pattern == "*" || pattern == "[*]"
}

fn matches_path_pattern(components: &[&str], pattern: &[&str]) -> bool {
    if !pattern.iter().any(|p| is_wildcard(p)) {
        // Exact match or prefix
        return components.starts_with(pattern);
    }

    let match_length = components.len().min(pattern.len());
    for i in 0..match_length {
        if !component_matches(pattern[i], components[i]) {
            return false;
        }
    }

    components.len() >= pattern.len() || pattern[match_length..].iter().all(|p| is_wildcard(p))
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps().iter().enumerate() {
            match step {
                PathStep::Property(name) if i == 0 => write!(f, "{name}")?,
                PathStep::Property(name) => write!(f, ".{name}")?,
                PathStep::Array(index) => write!(f, "[{index}]")?,
                PathStep::Map(key) => write!(f, "[{}]", escape_key(key))?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        match (&self.last, &other.last) {
            (None, None) => true,
            (Some(a), Some(b)) if Rc::ptr_eq(a, b) => true,
            (Some(a), Some(b)) => a.depth == b.depth && a.step == b.step && a.parent == b.parent,
            _ => false,
        }
    }
}

impl Eq for Path {}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.steps().cmp(&other.steps())
    }
}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.steps().hash(state);
    }
}
