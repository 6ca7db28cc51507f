//! Resolvable field values

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;

/// Prefix marking a symbolic reference to a key declared in the same project
pub const REF_PREFIX: &str = "ref:";

/// A field value that is either a literal remote identifier or a `ref:<key>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    /// A remote identifier used as-is (e.g. an existing ARN)
    Literal(String),
    /// Key of a resource declared earlier in the project
    Reference(String),
}

impl ResourceRef {
    /// Parse a raw field value. Only the exact `ref:` prefix makes a reference.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(REF_PREFIX) {
            Some(key) => ResourceRef::Reference(key.to_string()),
            None => ResourceRef::Literal(raw.to_string()),
        }
    }

    /// The referenced key, if this is a reference
    pub fn key(&self) -> Option<&str> {
        match self {
            ResourceRef::Reference(key) => Some(key),
            ResourceRef::Literal(_) => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ResourceRef::Reference(_))
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Literal(value) => write!(f, "{}", value),
            ResourceRef::Reference(key) => write!(f, "{}{}", REF_PREFIX, key),
        }
    }
}

/// Target group of a flow
///
/// A flow may point at a target group declared earlier (`ref:<key>`), at an
/// existing one by ARN, or at a document describing a target group to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowTargetGroup {
    Existing(ResourceRef),
    Document(PathBuf),
}

impl FlowTargetGroup {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with(REF_PREFIX) || raw.starts_with("arn:") {
            FlowTargetGroup::Existing(ResourceRef::parse(raw))
        } else {
            FlowTargetGroup::Document(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for FlowTargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowTargetGroup::Existing(reference) => write!(f, "{}", reference),
            FlowTargetGroup::Document(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Blank strings are treated as "not declared".
fn non_empty<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

pub(crate) fn optional_ref<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<ResourceRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty(deserializer)?.map(|raw| ResourceRef::parse(&raw)))
}

pub(crate) fn optional_flow_target_group<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<FlowTargetGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty(deserializer)?.map(|raw| FlowTargetGroup::parse(&raw)))
}

pub(crate) fn optional_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    non_empty(deserializer)
}
