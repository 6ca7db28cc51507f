//! Reference resolution

use crate::error::{ApplyError, Result};
use crate::model::ResourceRef;
use crate::registry::{Namespace, Registry};

/// Turn a field value into a concrete identifier
///
/// Literals are returned unchanged. A `ref:<key>` must have a non-empty
/// identifier in `namespace`, otherwise resolution fails: a dependent
/// resource is never created against an empty target.
pub fn resolve(registry: &Registry, namespace: Namespace, value: &ResourceRef) -> Result<String> {
    match value {
        ResourceRef::Literal(identifier) => Ok(identifier.clone()),
        ResourceRef::Reference(key) => registry
            .get(namespace, key)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApplyError::MissingReference {
                namespace,
                key: key.clone(),
            }),
    }
}

/// Same as [`resolve`] for fields that may be left out
pub fn resolve_optional(
    registry: &Registry,
    namespace: Namespace,
    value: Option<&ResourceRef>,
) -> Result<Option<String>> {
    value
        .map(|value| resolve(registry, namespace, value))
        .transpose()
}
