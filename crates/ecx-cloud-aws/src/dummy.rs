//! Canned responses for dummy runs
//!
//! With `--dummy` no aws process is spawned; every operation answers with
//! a plausible identifier derived from its input document.

use crate::types::{
    ContainerDefinitionInfo, DeploymentInfo, LoadBalancerInfo, PortMappingInfo, ServiceInfo,
    TargetGroupInfo, TaskDefinitionInfo,
};
use std::path::Path;

const ELB_PREFIX: &str = "arn:aws:elasticloadbalancing:us-west-2:123456789012";
const ECS_PREFIX: &str = "arn:aws:ecs:us-west-2:123456789012";

fn stem(document: &Path) -> String {
    document
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "dummy".to_string())
}

pub fn target_group(document: &Path) -> TargetGroupInfo {
    let name = stem(document);
    TargetGroupInfo {
        target_group_arn: format!("{}:targetgroup/{}/73e2d6bc24d8a067", ELB_PREFIX, name),
        target_group_name: name,
    }
}

pub fn load_balancer(document: &Path) -> LoadBalancerInfo {
    let name = stem(document);
    LoadBalancerInfo {
        load_balancer_arn: format!("{}:loadbalancer/app/{}/50dc6c495c0c9188", ELB_PREFIX, name),
        load_balancer_name: name,
        kind: Some("application".to_string()),
    }
}

pub fn listener_arn(document: &Path) -> String {
    format!(
        "{}:listener/app/dummy/50dc6c495c0c9188/{}",
        ELB_PREFIX,
        stem(document)
    )
}

pub fn rule_arn(document: &Path) -> String {
    format!(
        "{}:listener-rule/app/dummy/50dc6c495c0c9188/{}",
        ELB_PREFIX,
        stem(document)
    )
}

pub fn registered_task_definition(document: &Path) -> TaskDefinitionInfo {
    let family = stem(document);
    TaskDefinitionInfo {
        task_definition_arn: format!("{}:task-definition/{}:1", ECS_PREFIX, family),
        family,
        revision: Some(1),
        container_definitions: Vec::new(),
    }
}

/// One web container exposing an `http` mapping
pub fn described_task_definition(task_definition: &str) -> TaskDefinitionInfo {
    TaskDefinitionInfo {
        task_definition_arn: task_definition.to_string(),
        family: crate::ecs::extract_family_from_revision(task_definition),
        revision: None,
        container_definitions: vec![ContainerDefinitionInfo {
            name: "dmz-web".to_string(),
            image: Some("xxx/repository-dmz-web:tag".to_string()),
            port_mappings: vec![PortMappingInfo {
                name: "http".to_string(),
                container_port: 8080,
                protocol: Some("tcp".to_string()),
            }],
        }],
    }
}

pub fn created_service(document: &Path) -> ServiceInfo {
    let name = stem(document);
    ServiceInfo {
        service_arn: format!("{}:service/dummy/{}", ECS_PREFIX, name),
        service_name: name,
        task_definition: None,
        deployments: Vec::new(),
    }
}

pub fn described_service(service: &str) -> ServiceInfo {
    ServiceInfo {
        service_arn: service.to_string(),
        service_name: "dummy-service".to_string(),
        task_definition: None,
        deployments: vec![DeploymentInfo {
            id: "ecs-svc/1234567890123456789".to_string(),
            task_definition: format!("{}:task-definition/dummy:5", ECS_PREFIX),
            status: Some("PRIMARY".to_string()),
        }],
    }
}
