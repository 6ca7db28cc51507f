//! Container port selection for load-balanced services

use crate::gateway::TaskDefinition;

/// Port mapping name preferred for load balancer traffic
pub const HTTP_PORT_NAME: &str = "http";

/// A port mapping together with the container that declares it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerPort {
    pub container_name: String,
    pub port_name: String,
    pub container_port: u16,
}

/// Flatten every port mapping of every container, in declaration order
pub fn container_ports(task_definition: &TaskDefinition) -> Vec<ContainerPort> {
    task_definition
        .containers
        .iter()
        .flat_map(|container| {
            container
                .port_mappings
                .iter()
                .map(move |mapping| ContainerPort {
                    container_name: container.name.clone(),
                    port_name: mapping.name.clone(),
                    container_port: mapping.container_port,
                })
        })
        .collect()
}

/// The mapping named `http` wins regardless of position, otherwise the first one
pub fn select_load_balanced_port(ports: &[ContainerPort]) -> Option<&ContainerPort> {
    ports
        .iter()
        .find(|port| port.port_name == HTTP_PORT_NAME)
        .or_else(|| ports.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{ContainerDefinition, PortMapping};

    fn port(container: &str, name: &str, number: u16) -> ContainerPort {
        ContainerPort {
            container_name: container.to_string(),
            port_name: name.to_string(),
            container_port: number,
        }
    }

    #[test]
    fn test_http_mapping_wins_over_position() {
        let ports = vec![
            port("app", "metrics", 9090),
            port("app", "http", 8080),
            port("app", "", 3000),
        ];

        let selected = select_load_balanced_port(&ports).unwrap();
        assert_eq!(
            (selected.port_name.as_str(), selected.container_port),
            ("http", 8080)
        );
    }

    #[test]
    fn test_first_mapping_without_http() {
        let ports = vec![port("app", "metrics", 9090), port("sidecar", "", 3000)];

        let selected = select_load_balanced_port(&ports).unwrap();
        assert_eq!(selected.container_name, "app");
        assert_eq!(selected.container_port, 9090);
    }

    #[test]
    fn test_no_mappings() {
        assert!(select_load_balanced_port(&[]).is_none());
    }

    #[test]
    fn test_container_ports_flattens_in_order() {
        let task_definition = TaskDefinition {
            arn: "arn:td:web:1".to_string(),
            family: "web".to_string(),
            revision: Some(1),
            containers: vec![
                ContainerDefinition {
                    name: "proxy".to_string(),
                    image: None,
                    port_mappings: vec![PortMapping {
                        name: "admin".to_string(),
                        container_port: 9901,
                    }],
                },
                ContainerDefinition {
                    name: "web".to_string(),
                    image: Some("nginx:latest".to_string()),
                    port_mappings: vec![PortMapping {
                        name: "http".to_string(),
                        container_port: 80,
                    }],
                },
            ],
        };

        let ports = container_ports(&task_definition);
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0], port("proxy", "admin", 9901));

        let selected = select_load_balanced_port(&ports).unwrap();
        assert_eq!(selected.container_name, "web");
        assert_eq!(selected.container_port, 80);
    }
}
