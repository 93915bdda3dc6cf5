use std::collections::HashMap;

use crate::types::Value;

/// Variables visible while rendering part of a template.
///
/// Scopes form a chain: a loop iteration binds its item (and key) in a
/// child scope layered over the enclosing one, so bindings disappear as
/// soon as the child is dropped and never leak into sibling nodes.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    bindings: HashMap<String, Value>,
    parent: Option<&'p Scope<'p>>,
}

impl Scope<'static> {
    /// Create an empty root scope.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'p> Scope<'p> {
    /// Create an empty scope layered over this one.
    pub fn child(&self) -> Scope<'_> {
        Scope {
            bindings: HashMap::new(),
            parent: Some(self),
        }
    }

    /// Bind a name in this scope, shadowing any outer binding.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Look a name up, innermost scope first.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .get(name)
            .or_else(|| self.parent.and_then(|parent| parent.get(name)))
    }
}

impl FromIterator<(String, Value)> for Scope<'static> {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Scope {
            bindings: iter.into_iter().collect(),
            parent: None,
        }
    }
}
