//! aws CLI JSON output
//!
//! Only the fields ecx reads are declared; everything else is ignored.

use ecx_core::{ContainerDefinition, LoadBalancer, PortMapping, Service, TargetGroup, TaskDefinition};
use serde::{Deserialize, Serialize};

/// `elbv2 describe-target-groups` / `create-target-group`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetGroupsOutput {
    #[serde(rename = "TargetGroups", default)]
    pub target_groups: Vec<TargetGroupInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetGroupInfo {
    #[serde(rename = "TargetGroupArn", default)]
    pub target_group_arn: String,

    #[serde(rename = "TargetGroupName", default)]
    pub target_group_name: String,
}

impl From<TargetGroupInfo> for TargetGroup {
    fn from(info: TargetGroupInfo) -> Self {
        Self {
            arn: info.target_group_arn,
            name: info.target_group_name,
        }
    }
}

/// `elbv2 describe-load-balancers` / `create-load-balancer`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadBalancersOutput {
    #[serde(rename = "LoadBalancers", default)]
    pub load_balancers: Vec<LoadBalancerInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadBalancerInfo {
    #[serde(rename = "LoadBalancerArn", default)]
    pub load_balancer_arn: String,

    #[serde(rename = "LoadBalancerName", default)]
    pub load_balancer_name: String,

    #[serde(rename = "Type")]
    pub kind: Option<String>,
}

impl From<LoadBalancerInfo> for LoadBalancer {
    fn from(info: LoadBalancerInfo) -> Self {
        Self {
            arn: info.load_balancer_arn,
            name: info.load_balancer_name,
            kind: info.kind,
        }
    }
}

/// `elbv2 create-listener`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListenersOutput {
    #[serde(rename = "Listeners", default)]
    pub listeners: Vec<ListenerInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListenerInfo {
    #[serde(rename = "ListenerArn", default)]
    pub listener_arn: String,
}

/// `elbv2 create-rule`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesOutput {
    #[serde(rename = "Rules", default)]
    pub rules: Vec<RuleInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleInfo {
    #[serde(rename = "RuleArn", default)]
    pub rule_arn: String,

    #[serde(rename = "Priority")]
    pub priority: Option<String>,
}

/// `ecs register-task-definition` / `describe-task-definition`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionOutput {
    pub task_definition: TaskDefinitionInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionInfo {
    #[serde(default)]
    pub task_definition_arn: String,

    #[serde(default)]
    pub family: String,

    pub revision: Option<u32>,

    #[serde(default)]
    pub container_definitions: Vec<ContainerDefinitionInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinitionInfo {
    #[serde(default)]
    pub name: String,

    pub image: Option<String>,

    #[serde(default)]
    pub port_mappings: Vec<PortMappingInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMappingInfo {
    #[serde(default)]
    pub name: String,

    /// Absent when the mapping declares a port range
    #[serde(default)]
    pub container_port: u16,

    pub protocol: Option<String>,
}

impl From<TaskDefinitionInfo> for TaskDefinition {
    fn from(info: TaskDefinitionInfo) -> Self {
        Self {
            arn: info.task_definition_arn,
            family: info.family,
            revision: info.revision,
            containers: info
                .container_definitions
                .into_iter()
                .map(|container| ContainerDefinition {
                    name: container.name,
                    image: container.image,
                    port_mappings: container
                        .port_mappings
                        .into_iter()
                        .filter(|mapping| mapping.container_port > 0)
                        .map(|mapping| PortMapping {
                            name: mapping.name,
                            container_port: mapping.container_port,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// `ecs create-service`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceOutput {
    pub service: ServiceInfo,
}

/// `ecs describe-services`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesOutput {
    #[serde(default)]
    pub services: Vec<ServiceInfo>,

    #[serde(default)]
    pub failures: Vec<FailureInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    #[serde(default)]
    pub service_arn: String,

    #[serde(default)]
    pub service_name: String,

    /// Task definition of the primary deployment
    pub task_definition: Option<String>,

    #[serde(default)]
    pub deployments: Vec<DeploymentInfo>,
}

impl ServiceInfo {
    /// Task definition ARN of the first deployment, falling back to the
    /// service's own task definition
    pub fn current_task_definition(&self) -> Option<&str> {
        self.deployments
            .first()
            .map(|d| d.task_definition.as_str())
            .filter(|arn| !arn.is_empty())
            .or(self.task_definition.as_deref())
    }
}

impl From<ServiceInfo> for Service {
    fn from(info: ServiceInfo) -> Self {
        Self {
            arn: info.service_arn,
            name: info.service_name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentInfo {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub task_definition: String,

    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureInfo {
    pub arn: Option<String>,
    pub reason: Option<String>,
}
