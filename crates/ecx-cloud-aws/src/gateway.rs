//! Gateway implementation over the aws CLI

use crate::aws_cli::AwsCli;
use async_trait::async_trait;
use ecx_core::{
    CreateListener, CreateRule, CreateService, Gateway, GatewayResult, Listener, ListenerRule,
    LoadBalancer, Service, TargetGroup, TaskDefinition,
};
use std::path::Path;

/// AWS gateway
pub struct AwsGateway {
    cli: AwsCli,
}

impl AwsGateway {
    pub fn new(cli: AwsCli) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl Gateway for AwsGateway {
    async fn describe_target_groups(&self, name: &str) -> GatewayResult<Vec<TargetGroup>> {
        let found = self.cli.describe_target_groups(name).await?;
        Ok(found.into_iter().map(TargetGroup::from).collect())
    }

    async fn create_target_group(&self, document: &Path) -> GatewayResult<TargetGroup> {
        Ok(self.cli.create_target_group(document).await?.into())
    }

    async fn describe_load_balancers(&self, name: &str) -> GatewayResult<Vec<LoadBalancer>> {
        let found = self.cli.describe_load_balancers(name).await?;
        Ok(found.into_iter().map(LoadBalancer::from).collect())
    }

    async fn create_load_balancer(&self, document: &Path) -> GatewayResult<LoadBalancer> {
        Ok(self.cli.create_load_balancer(document).await?.into())
    }

    async fn create_listener(&self, request: &CreateListener) -> GatewayResult<Listener> {
        let arn = self.cli.create_listener(request).await?;
        Ok(Listener { arn })
    }

    async fn create_rule(&self, request: &CreateRule) -> GatewayResult<ListenerRule> {
        let arn = self.cli.create_rule(request).await?;
        Ok(ListenerRule { arn })
    }

    async fn create_log_group(&self, name: &str) -> GatewayResult<()> {
        Ok(self.cli.create_log_group(name).await?)
    }

    async fn put_retention_policy(&self, name: &str, days: u32) -> GatewayResult<()> {
        Ok(self.cli.put_retention_policy(name, days).await?)
    }

    async fn register_task_definition(&self, document: &Path) -> GatewayResult<TaskDefinition> {
        Ok(self.cli.register_task_definition(document).await?.into())
    }

    async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> GatewayResult<TaskDefinition> {
        Ok(self.cli.describe_task_definition(task_definition).await?.into())
    }

    async fn create_service(&self, request: &CreateService) -> GatewayResult<Service> {
        Ok(self.cli.create_service(request).await?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecx_core::{GatewayError, NullReporter, Pipeline, parse_project};

    #[tokio::test]
    async fn test_dummy_gateway_runs_a_whole_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        for (name, content) in [
            ("tg.json", r#"{ "Name": "web" }"#),
            ("lb.json", r#"{ "Name": "public" }"#),
            ("listener.json", "{}"),
            ("service.json", r#"{ "taskDefinition": "web:3" }"#),
        ] {
            std::fs::write(temp_dir.path().join(name), content).unwrap();
        }
        let project = parse_project(
            r#"
api: ecx
apiVersion: "0.1"
targetGroups:
  - key: web
    value: tg.json
loadBalancers:
  - key: public
    value: lb.json
listeners:
  - key: https
    value: listener.json
    loadBalancer: ref:public
    targetGroup: ref:web
flows:
  - name: web
    targetGroup: ref:web
    service: service.json
"#,
        )
        .unwrap();
        let gateway = AwsGateway::new(AwsCli::new().with_dummy(true));

        let mut pipeline = Pipeline::new(&gateway, temp_dir.path());
        let report = pipeline.run(&project, &mut NullReporter).await.unwrap();

        assert!(report.is_success());
        assert_eq!(
            pipeline
                .registry()
                .get(ecx_core::Namespace::TargetGroup, "web"),
            Some("arn:aws:elasticloadbalancing:us-west-2:123456789012:targetgroup/tg/73e2d6bc24d8a067")
        );
    }

    #[tokio::test]
    async fn test_missing_cli_surfaces_as_failure() {
        let gateway = AwsGateway::new(AwsCli::new().with_binary("/nonexistent/aws"));

        let result = gateway.create_log_group("/ecs/app").await;
        assert!(matches!(result, Err(GatewayError::Failed(_))));
    }
}
