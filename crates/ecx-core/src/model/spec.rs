//! Per-category resource specifications

use super::reference::{
    FlowTargetGroup, ResourceRef, optional_flow_target_group, optional_ref, optional_string,
};
use serde::Deserialize;

/// Target group declared by a `create-target-group` input document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TargetGroupSpec {
    /// Key other resources use to reference this one
    #[serde(default)]
    pub key: String,

    /// Path to the input document
    #[serde(default)]
    pub value: String,
}

/// Load balancer declared by a `create-load-balancer` input document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoadBalancerSpec {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerSpec {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub value: String,

    /// Resolved in the load balancer namespace
    #[serde(default, deserialize_with = "optional_ref")]
    pub load_balancer: Option<ResourceRef>,

    /// Default forward target, resolved in the target group namespace
    #[serde(default, deserialize_with = "optional_ref")]
    pub target_group: Option<ResourceRef>,

    /// Created in order once the listener exists
    #[serde(default)]
    pub rules: Vec<ListenerRuleSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerRuleSpec {
    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub priority: Option<u32>,

    /// Falls back to the listener's target group when absent
    #[serde(default, deserialize_with = "optional_ref")]
    pub target_group: Option<ResourceRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogGroupSpec {
    #[serde(default)]
    pub group: String,

    /// Retention in days, 0 keeps the default (never expire)
    #[serde(default)]
    pub retention: u32,
}

/// Task definition document registered as a new revision
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "TaskDefinitionEntry")]
pub struct TaskDefinitionSpec {
    pub value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskDefinitionEntry {
    Path(String),
    Spec { value: String },
}

impl From<TaskDefinitionEntry> for TaskDefinitionSpec {
    fn from(entry: TaskDefinitionEntry) -> Self {
        match entry {
            TaskDefinitionEntry::Path(value) | TaskDefinitionEntry::Spec { value } => {
                Self { value }
            }
        }
    }
}

/// Composite unit of work: target group + rules + service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "optional_flow_target_group")]
    pub target_group: Option<FlowTargetGroup>,

    /// Rules forwarding to the flow's target group
    #[serde(default)]
    pub rules: Vec<FlowRuleSpec>,

    /// Path to a `create-service` input document
    #[serde(default, deserialize_with = "optional_string")]
    pub service: Option<String>,

    #[serde(default)]
    pub health_check_grace_period_seconds: Option<u32>,
}

impl FlowSpec {
    pub fn is_empty(&self) -> bool {
        self.target_group.is_none() && self.rules.is_empty() && self.service.is_none()
    }
}

/// Rule of a flow, either a bare document path or a full entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "FlowRuleEntry")]
pub struct FlowRuleSpec {
    pub value: String,
    pub priority: Option<u32>,
    /// Resolved in the listener namespace
    pub listener: Option<ResourceRef>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlowRuleEntry {
    Path(String),
    Spec(FlowRuleFields),
}

#[derive(Deserialize)]
struct FlowRuleFields {
    #[serde(default)]
    value: String,
    #[serde(default)]
    priority: Option<u32>,
    #[serde(default, deserialize_with = "optional_ref")]
    listener: Option<ResourceRef>,
}

impl From<FlowRuleEntry> for FlowRuleSpec {
    fn from(entry: FlowRuleEntry) -> Self {
        match entry {
            FlowRuleEntry::Path(value) => Self {
                value,
                ..Default::default()
            },
            FlowRuleEntry::Spec(fields) => Self {
                value: fields.value,
                priority: fields.priority,
                listener: fields.listener,
            },
        }
    }
}
