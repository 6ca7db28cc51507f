//! Run-scoped registry of resource identifiers

use crate::error::{ApplyError, Result};
use std::collections::HashMap;
use std::fmt;

/// Independent key spaces of the registry
///
/// Keys are never shared across namespaces: `ref:web` in a load balancer
/// field and `ref:web` in a target group field point at different entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    LoadBalancer,
    Listener,
    TargetGroup,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::LoadBalancer => write!(f, "load balancer"),
            Namespace::Listener => write!(f, "listener"),
            Namespace::TargetGroup => write!(f, "target group"),
        }
    }
}

/// Mapping from `(namespace, key)` to the identifier of a created or
/// discovered resource
///
/// Created empty for each apply run and only ever grows.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<(Namespace, String), String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `identifier` under `key`
    ///
    /// Returns `Ok(false)` without storing anything when either the key or
    /// the identifier is empty: resources nothing refers to need no key.
    /// A key that is already registered in the namespace is rejected.
    pub fn put(&mut self, namespace: Namespace, key: &str, identifier: &str) -> Result<bool> {
        if key.is_empty() || identifier.is_empty() {
            return Ok(false);
        }

        let entry = (namespace, key.to_string());
        if self.entries.contains_key(&entry) {
            return Err(ApplyError::DuplicateKey {
                namespace,
                key: key.to_string(),
            });
        }

        tracing::debug!("Registered {} '{}' -> {}", namespace, key, identifier);
        self.entries.insert(entry, identifier.to_string());
        Ok(true)
    }

    pub fn get(&self, namespace: Namespace, key: &str) -> Option<&str> {
        self.entries
            .get(&(namespace, key.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
