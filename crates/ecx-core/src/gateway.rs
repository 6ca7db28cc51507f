//! Remote operation gateway
//!
//! Boundary between the apply pipeline and the cloud. The pipeline awaits
//! every operation before issuing the next one, so implementations never
//! see concurrent calls from a single run.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure reported by a remote operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The remote side has no resource matching the request
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Failed(String),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Operations the pipeline needs from the cloud
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Target groups whose name is exactly `name`
    async fn describe_target_groups(&self, name: &str) -> GatewayResult<Vec<TargetGroup>>;

    async fn create_target_group(&self, document: &Path) -> GatewayResult<TargetGroup>;

    /// Load balancers whose name is exactly `name`
    async fn describe_load_balancers(&self, name: &str) -> GatewayResult<Vec<LoadBalancer>>;

    async fn create_load_balancer(&self, document: &Path) -> GatewayResult<LoadBalancer>;

    async fn create_listener(&self, request: &CreateListener) -> GatewayResult<Listener>;

    async fn create_rule(&self, request: &CreateRule) -> GatewayResult<ListenerRule>;

    async fn create_log_group(&self, name: &str) -> GatewayResult<()>;

    async fn put_retention_policy(&self, name: &str, days: u32) -> GatewayResult<()>;

    /// Register the document as a new task definition revision
    async fn register_task_definition(&self, document: &Path) -> GatewayResult<TaskDefinition>;

    /// `task_definition` is a family, `family:revision` or a full ARN
    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> GatewayResult<TaskDefinition>;

    async fn create_service(&self, request: &CreateService) -> GatewayResult<Service>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetGroup {
    pub arn: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBalancer {
    pub arn: String,
    pub name: String,
    /// application, network or gateway
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listener {
    pub arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerRule {
    pub arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDefinition {
    pub arn: String,
    pub family: String,
    pub revision: Option<u32>,
    pub containers: Vec<ContainerDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDefinition {
    pub name: String,
    pub image: Option<String>,
    pub port_mappings: Vec<PortMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortMapping {
    /// Mapping name, empty when not declared
    pub name: String,
    pub container_port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    pub arn: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateListener {
    pub document: PathBuf,
    pub load_balancer_arn: Option<String>,
    /// Default `forward` action target
    pub target_group_arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRule {
    pub document: PathBuf,
    pub listener_arn: Option<String>,
    /// `forward` action target
    pub target_group_arn: Option<String>,
    pub priority: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateService {
    pub document: PathBuf,
    pub load_balancer: Option<ServiceLoadBalancer>,
    pub health_check_grace_period_seconds: Option<u32>,
}

/// Target group wiring of an ECS service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceLoadBalancer {
    pub target_group_arn: String,
    pub container_name: String,
    pub container_port: u16,
}
