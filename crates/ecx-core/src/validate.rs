//! Offline project validation
//!
//! [`check_project`] holds the structural rules an apply run refuses to
//! start without. [`validate_project`] additionally checks references and
//! documents on disk, without talking to the cloud.

use crate::error::{ApplyError, Result};
use crate::model::{FlowTargetGroup, Project, ResourceRef};
use crate::registry::Namespace;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Keys declared per namespace, in declaration order
fn declared_keys(project: &Project, namespace: Namespace) -> Vec<&str> {
    let keys: Vec<&str> = match namespace {
        Namespace::TargetGroup => project.target_groups.iter().map(|s| s.key.as_str()).collect(),
        Namespace::LoadBalancer => project
            .load_balancers
            .iter()
            .map(|s| s.key.as_str())
            .collect(),
        Namespace::Listener => project.listeners.iter().map(|s| s.key.as_str()).collect(),
    };
    keys.into_iter().filter(|k| !k.is_empty()).collect()
}

/// Keys an apply run registers: entries without a value are skipped and
/// never become resolvable
fn registered_keys(project: &Project, namespace: Namespace) -> HashSet<&str> {
    let entries: Vec<(&str, &str)> = match namespace {
        Namespace::TargetGroup => project
            .target_groups
            .iter()
            .map(|s| (s.key.as_str(), s.value.as_str()))
            .collect(),
        Namespace::LoadBalancer => project
            .load_balancers
            .iter()
            .map(|s| (s.key.as_str(), s.value.as_str()))
            .collect(),
        Namespace::Listener => project
            .listeners
            .iter()
            .map(|s| (s.key.as_str(), s.value.as_str()))
            .collect(),
    };
    entries
        .into_iter()
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .map(|(key, _)| key)
        .collect()
}

fn first_duplicate<'a>(keys: &[&'a str]) -> Option<&'a str> {
    let mut seen = HashSet::new();
    keys.iter().copied().find(|key| !seen.insert(*key))
}

/// Rules an apply run checks before issuing any remote call
pub fn check_project(project: &Project) -> Result<()> {
    for namespace in [
        Namespace::TargetGroup,
        Namespace::LoadBalancer,
        Namespace::Listener,
    ] {
        if let Some(key) = first_duplicate(&declared_keys(project, namespace)) {
            return Err(ApplyError::DuplicateKey {
                namespace,
                key: key.to_string(),
            });
        }
    }

    for flow in &project.flows {
        if !flow.rules.is_empty() && flow.target_group.is_none() {
            return Err(ApplyError::InvalidProject(format!(
                "flow '{}' declares rules but no target group",
                flow.name
            )));
        }
    }

    Ok(())
}

/// Collects every problem found in the project
pub fn validate_project(project: &Project, base_dir: &Path) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Err(e) = check_project(project) {
        issues.push(ValidationIssue::error(e.to_string()));
    }

    let target_groups = registered_keys(project, Namespace::TargetGroup);
    let load_balancers = registered_keys(project, Namespace::LoadBalancer);
    let listeners = registered_keys(project, Namespace::Listener);

    let mut check_ref = |owner: &str,
                         value: Option<&ResourceRef>,
                         namespace: Namespace,
                         keys: &HashSet<&str>| {
        if let Some(key) = value.and_then(ResourceRef::key)
            && !keys.contains(key)
        {
            issues.push(ValidationIssue::error(format!(
                "{}: 'ref:{}' does not match any {} key",
                owner, key, namespace
            )));
        }
    };

    for listener in &project.listeners {
        let owner = format!("listener '{}'", label(&listener.key, &listener.value));
        check_ref(
            &owner,
            listener.load_balancer.as_ref(),
            Namespace::LoadBalancer,
            &load_balancers,
        );
        check_ref(
            &owner,
            listener.target_group.as_ref(),
            Namespace::TargetGroup,
            &target_groups,
        );
        for rule in &listener.rules {
            check_ref(
                &format!("{} rule '{}'", owner, rule.value),
                rule.target_group.as_ref(),
                Namespace::TargetGroup,
                &target_groups,
            );
        }
    }

    for flow in &project.flows {
        let owner = format!("flow '{}'", flow.name);
        if let Some(FlowTargetGroup::Existing(reference)) = &flow.target_group {
            check_ref(&owner, Some(reference), Namespace::TargetGroup, &target_groups);
        }
        for rule in &flow.rules {
            check_ref(
                &format!("{} rule '{}'", owner, rule.value),
                rule.listener.as_ref(),
                Namespace::Listener,
                &listeners,
            );
        }
    }

    for listener in &project.listeners {
        for rule in &listener.rules {
            if rule.target_group.is_none() && listener.target_group.is_none() {
                issues.push(ValidationIssue::warning(format!(
                    "listener '{}' rule '{}' has no target group, its document must declare the actions",
                    label(&listener.key, &listener.value),
                    rule.value
                )));
            }
        }
    }

    for path in documents(project) {
        if path.is_empty() {
            continue;
        }
        let full = base_dir.join(path);
        if !full.is_file() {
            issues.push(ValidationIssue::error(format!(
                "document not found: {}",
                full.display()
            )));
        }
    }

    let empty_values = project.target_groups.iter().filter(|s| s.value.is_empty()).count()
        + project.load_balancers.iter().filter(|s| s.value.is_empty()).count()
        + project.listeners.iter().filter(|s| s.value.is_empty()).count();
    if empty_values > 0 {
        issues.push(ValidationIssue::warning(format!(
            "{} entries without a value will be skipped",
            empty_values
        )));
    }

    for flow in project.flows.iter().filter(|f| f.is_empty()) {
        issues.push(ValidationIssue::warning(format!(
            "flow '{}' declares nothing to apply",
            flow.name
        )));
    }

    issues
}

fn label<'a>(key: &'a str, value: &'a str) -> &'a str {
    if key.is_empty() { value } else { key }
}

/// Every document path referenced by the project
fn documents(project: &Project) -> Vec<&str> {
    let mut paths: Vec<&str> = Vec::new();
    paths.extend(project.target_groups.iter().map(|s| s.value.as_str()));
    paths.extend(project.load_balancers.iter().map(|s| s.value.as_str()));
    for listener in &project.listeners {
        paths.push(&listener.value);
        paths.extend(listener.rules.iter().map(|r| r.value.as_str()));
    }
    paths.extend(project.task_definitions.iter().map(|s| s.value.as_str()));
    for flow in &project.flows {
        if let Some(FlowTargetGroup::Document(path)) = &flow.target_group
            && let Some(path) = path.to_str()
        {
            paths.push(path);
        }
        paths.extend(flow.rules.iter().map(|r| r.value.as_str()));
        if let Some(service) = &flow.service {
            paths.push(service);
        }
    }
    paths
}
