//! Project model
//!
//! In-memory form of an `ecx.yaml` project file.

mod reference;
mod spec;

pub use reference::{FlowTargetGroup, REF_PREFIX, ResourceRef};
pub use spec::{
    FlowRuleSpec, FlowSpec, ListenerRuleSpec, ListenerSpec, LoadBalancerSpec, LogGroupSpec,
    TargetGroupSpec, TaskDefinitionSpec,
};

use serde::{Deserialize, Deserializer};
use std::fmt;

/// A parsed project file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub api: String,

    #[serde(default, deserialize_with = "scalar_string")]
    pub api_version: String,

    #[serde(default)]
    pub target_groups: Vec<TargetGroupSpec>,

    #[serde(default)]
    pub load_balancers: Vec<LoadBalancerSpec>,

    #[serde(default)]
    pub listeners: Vec<ListenerSpec>,

    #[serde(default)]
    pub log_groups: Vec<LogGroupSpec>,

    #[serde(default)]
    pub task_definitions: Vec<TaskDefinitionSpec>,

    #[serde(default)]
    pub flows: Vec<FlowSpec>,
}

impl Project {
    /// Total number of top-level entries across all categories
    pub fn len(&self) -> usize {
        self.target_groups.len()
            + self.load_balancers.len()
            + self.listeners.len()
            + self.log_groups.len()
            + self.task_definitions.len()
            + self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `apiVersion: 0.1` is a float to YAML, accept it as well as the quoted form.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    })
}

/// Kind of resource handled by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    TargetGroup,
    LoadBalancer,
    Listener,
    ListenerRule,
    LogGroup,
    TaskDefinition,
    Flow,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::TargetGroup => write!(f, "target group"),
            Category::LoadBalancer => write!(f, "load balancer"),
            Category::Listener => write!(f, "listener"),
            Category::ListenerRule => write!(f, "listener rule"),
            Category::LogGroup => write!(f, "log group"),
            Category::TaskDefinition => write!(f, "task definition"),
            Category::Flow => write!(f, "flow"),
        }
    }
}
