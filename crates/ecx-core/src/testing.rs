//! Recording gateway for tests

use crate::gateway::{
    ContainerDefinition, CreateListener, CreateRule, CreateService, Gateway, GatewayError,
    GatewayResult, Listener, ListenerRule, LoadBalancer, PortMapping, Service, TargetGroup,
    TaskDefinition,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DescribeTargetGroups(String),
    CreateTargetGroup(PathBuf),
    DescribeLoadBalancers(String),
    CreateLoadBalancer(PathBuf),
    CreateListener(CreateListener),
    CreateRule(CreateRule),
    CreateLogGroup(String),
    PutRetentionPolicy(String, u32),
    RegisterTaskDefinition(PathBuf),
    DescribeTaskDefinition(String),
    CreateService(CreateService),
}

/// In-memory gateway that records every call in order
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    existing_target_groups: Vec<TargetGroup>,
    existing_load_balancers: Vec<LoadBalancer>,
    existing_log_groups: Vec<String>,
    task_definitions: HashMap<String, TaskDefinition>,
    /// 1-based index of the `create_rule` call that fails
    fail_rule_at: Option<usize>,
    describe_error: Option<GatewayError>,
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_group(mut self, name: &str, arn: &str) -> Self {
        self.existing_target_groups.push(TargetGroup {
            arn: arn.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_load_balancer(mut self, name: &str, arn: &str) -> Self {
        self.existing_load_balancers.push(LoadBalancer {
            arn: arn.to_string(),
            name: name.to_string(),
            kind: Some("application".to_string()),
        });
        self
    }

    pub fn with_log_group(mut self, name: &str) -> Self {
        self.existing_log_groups.push(name.to_string());
        self
    }

    /// Register a task definition whose containers expose `mappings`
    /// as `(container, mapping name, port)`
    pub fn with_task_definition(mut self, name: &str, mappings: &[(&str, &str, u16)]) -> Self {
        let mut containers: Vec<ContainerDefinition> = Vec::new();
        for (container, mapping, port) in mappings {
            let mapping = PortMapping {
                name: mapping.to_string(),
                container_port: *port,
            };
            match containers.iter_mut().find(|c| c.name == *container) {
                Some(existing) => existing.port_mappings.push(mapping),
                None => containers.push(ContainerDefinition {
                    name: container.to_string(),
                    image: None,
                    port_mappings: vec![mapping],
                }),
            }
        }
        self.task_definitions.insert(
            name.to_string(),
            TaskDefinition {
                arn: format!("arn:td:{}", name),
                family: name.to_string(),
                revision: Some(1),
                containers,
            },
        );
        self
    }

    pub fn failing_rule(mut self, index: usize) -> Self {
        self.fail_rule_at = Some(index);
        self
    }

    pub fn failing_describe(mut self, error: GatewayError) -> Self {
        self.describe_error = Some(error);
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    pub fn created_rules(&self) -> Vec<CreateRule> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateRule(request) => Some(request),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn describe_target_groups(&self, name: &str) -> GatewayResult<Vec<TargetGroup>> {
        self.record(Call::DescribeTargetGroups(name.to_string()));
        if let Some(error) = &self.describe_error {
            return Err(error.clone());
        }
        let found: Vec<TargetGroup> = self
            .existing_target_groups
            .iter()
            .filter(|tg| tg.name == name)
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(GatewayError::NotFound(format!("TargetGroupNotFound: {}", name)));
        }
        Ok(found)
    }

    async fn create_target_group(&self, document: &Path) -> GatewayResult<TargetGroup> {
        self.record(Call::CreateTargetGroup(document.to_path_buf()));
        Ok(TargetGroup {
            arn: format!("arn:tg:{}", stem(document)),
            name: stem(document),
        })
    }

    async fn describe_load_balancers(&self, name: &str) -> GatewayResult<Vec<LoadBalancer>> {
        self.record(Call::DescribeLoadBalancers(name.to_string()));
        if let Some(error) = &self.describe_error {
            return Err(error.clone());
        }
        let found: Vec<LoadBalancer> = self
            .existing_load_balancers
            .iter()
            .filter(|lb| lb.name == name)
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(GatewayError::NotFound(format!(
                "LoadBalancerNotFound: {}",
                name
            )));
        }
        Ok(found)
    }

    async fn create_load_balancer(&self, document: &Path) -> GatewayResult<LoadBalancer> {
        self.record(Call::CreateLoadBalancer(document.to_path_buf()));
        Ok(LoadBalancer {
            arn: format!("arn:lb:{}", stem(document)),
            name: stem(document),
            kind: Some("application".to_string()),
        })
    }

    async fn create_listener(&self, request: &CreateListener) -> GatewayResult<Listener> {
        self.record(Call::CreateListener(request.clone()));
        Ok(Listener {
            arn: format!("arn:listener:{}", stem(&request.document)),
        })
    }

    async fn create_rule(&self, request: &CreateRule) -> GatewayResult<ListenerRule> {
        self.record(Call::CreateRule(request.clone()));
        let attempt = self.count(|c| matches!(c, Call::CreateRule(_)));
        if self.fail_rule_at == Some(attempt) {
            return Err(GatewayError::Failed(format!(
                "PriorityInUse: rule {} rejected",
                attempt
            )));
        }
        Ok(ListenerRule {
            arn: format!("arn:rule:{}", attempt),
        })
    }

    async fn create_log_group(&self, name: &str) -> GatewayResult<()> {
        self.record(Call::CreateLogGroup(name.to_string()));
        if self.existing_log_groups.iter().any(|g| g == name) {
            return Err(GatewayError::AlreadyExists(name.to_string()));
        }
        Ok(())
    }

    async fn put_retention_policy(&self, name: &str, days: u32) -> GatewayResult<()> {
        self.record(Call::PutRetentionPolicy(name.to_string(), days));
        Ok(())
    }

    async fn register_task_definition(&self, document: &Path) -> GatewayResult<TaskDefinition> {
        self.record(Call::RegisterTaskDefinition(document.to_path_buf()));
        Ok(TaskDefinition {
            arn: format!("arn:td:{}:1", stem(document)),
            family: stem(document),
            revision: Some(1),
            containers: Vec::new(),
        })
    }

    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> GatewayResult<TaskDefinition> {
        self.record(Call::DescribeTaskDefinition(task_definition.to_string()));
        self.task_definitions
            .get(task_definition)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(task_definition.to_string()))
    }

    async fn create_service(&self, request: &CreateService) -> GatewayResult<Service> {
        self.record(Call::CreateService(request.clone()));
        Ok(Service {
            arn: format!("arn:service:{}", stem(&request.document)),
            name: stem(&request.document),
        })
    }
}
