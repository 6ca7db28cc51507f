//! aws CLI wrapper
//!
//! Every remote operation is one `aws` process. Resource documents are
//! passed through `--cli-input-json file://<path>` and the JSON printed on
//! stdout is parsed into the types of [`crate::types`].

use crate::dummy;
use crate::ecs;
use crate::error::{AwsError, Result};
use crate::types::{
    ListenerInfo, ListenersOutput, LoadBalancerInfo, LoadBalancersOutput, RuleInfo, RulesOutput,
    ServiceInfo, ServiceOutput, ServicesOutput, TargetGroupInfo, TargetGroupsOutput,
    TaskDefinitionInfo, TaskDefinitionOutput,
};
use ecx_core::{CreateListener, CreateRule, CreateService};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

pub const DEFAULT_BINARY: &str = "aws";

/// aws CLI wrapper
#[derive(Debug, Clone)]
pub struct AwsCli {
    binary: String,
    profile: Option<String>,
    region: Option<String>,
    /// Log commands without running them
    dummy: bool,
}

impl Default for AwsCli {
    fn default() -> Self {
        Self::new()
    }
}

impl AwsCli {
    pub fn new() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            profile: None,
            region: None,
            dummy: false,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile.filter(|p| !p.is_empty());
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region.filter(|r| !r.is_empty());
        self
    }

    pub fn with_dummy(mut self, dummy: bool) -> Self {
        self.dummy = dummy;
        self
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy
    }

    /// Check the CLI can be started and return its version line
    pub async fn check_installed(&self) -> Result<String> {
        if self.dummy {
            return Ok("aws-cli (dummy)".to_string());
        }
        let output = self.run_command(&["--version".to_string()]).await?;
        Ok(output.trim().to_string())
    }

    fn command_line(&self, args: Vec<String>) -> Vec<String> {
        let mut args = args;
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        args
    }

    /// Run an aws command and return stdout
    async fn run_command(&self, args: &[String]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AwsError::AwsCliNotFound(self.binary.clone()),
            _ => AwsError::IoError(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(&stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a command and parse its output, or answer with `dummy` in dummy mode
    async fn execute<T: DeserializeOwned>(
        &self,
        args: Vec<String>,
        dummy: impl FnOnce() -> T,
    ) -> Result<T> {
        let args = self.command_line(args);
        tracing::debug!("Running: {} {}", self.binary, args.join(" "));

        if self.dummy {
            return Ok(dummy());
        }

        let output = self.run_command(&args).await?;
        parse_output(&output)
    }

    pub async fn describe_target_groups(&self, name: &str) -> Result<Vec<TargetGroupInfo>> {
        let output: TargetGroupsOutput = self
            .execute(
                args(&["elbv2", "describe-target-groups", "--names", name, "--output", "json"]),
                TargetGroupsOutput::default,
            )
            .await?;
        Ok(output.target_groups)
    }

    pub async fn create_target_group(&self, document: &Path) -> Result<TargetGroupInfo> {
        let output: TargetGroupsOutput = self
            .execute(
                with_document(&["elbv2", "create-target-group"], document),
                || TargetGroupsOutput {
                    target_groups: vec![dummy::target_group(document)],
                },
            )
            .await?;
        first(output.target_groups, "create-target-group")
    }

    pub async fn describe_load_balancers(&self, name: &str) -> Result<Vec<LoadBalancerInfo>> {
        let output: LoadBalancersOutput = self
            .execute(
                args(&["elbv2", "describe-load-balancers", "--names", name, "--output", "json"]),
                LoadBalancersOutput::default,
            )
            .await?;
        Ok(output.load_balancers)
    }

    pub async fn create_load_balancer(&self, document: &Path) -> Result<LoadBalancerInfo> {
        let output: LoadBalancersOutput = self
            .execute(
                with_document(&["elbv2", "create-load-balancer"], document),
                || LoadBalancersOutput {
                    load_balancers: vec![dummy::load_balancer(document)],
                },
            )
            .await?;
        first(output.load_balancers, "create-load-balancer")
    }

    pub async fn create_listener(&self, request: &CreateListener) -> Result<String> {
        let output: ListenersOutput = self
            .execute(create_listener_args(request), || ListenersOutput {
                listeners: vec![ListenerInfo {
                    listener_arn: dummy::listener_arn(&request.document),
                }],
            })
            .await?;
        Ok(first(output.listeners, "create-listener")?.listener_arn)
    }

    pub async fn create_rule(&self, request: &CreateRule) -> Result<String> {
        let output: RulesOutput = self
            .execute(create_rule_args(request), || RulesOutput {
                rules: vec![RuleInfo {
                    rule_arn: dummy::rule_arn(&request.document),
                    priority: request.priority.map(|p| p.to_string()),
                }],
            })
            .await?;
        Ok(first(output.rules, "create-rule")?.rule_arn)
    }

    pub async fn create_log_group(&self, name: &str) -> Result<()> {
        let _: Value = self
            .execute(
                args(&["logs", "create-log-group", "--log-group-name", name]),
                || Value::Null,
            )
            .await?;
        Ok(())
    }

    pub async fn put_retention_policy(&self, name: &str, days: u32) -> Result<()> {
        let days = days.to_string();
        let _: Value = self
            .execute(
                args(&[
                    "logs",
                    "put-retention-policy",
                    "--log-group-name",
                    name,
                    "--retention-in-days",
                    &days,
                ]),
                || Value::Null,
            )
            .await?;
        Ok(())
    }

    pub async fn register_task_definition(&self, document: &Path) -> Result<TaskDefinitionInfo> {
        let output: TaskDefinitionOutput = self
            .execute(
                with_document(&["ecs", "register-task-definition"], document),
                || TaskDefinitionOutput {
                    task_definition: dummy::registered_task_definition(document),
                },
            )
            .await?;
        Ok(output.task_definition)
    }

    /// `task_definition` is a family, `family:revision` or a full ARN
    pub async fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> Result<TaskDefinitionInfo> {
        let output: TaskDefinitionOutput = self
            .execute(
                describe_task_definition_args(task_definition),
                || TaskDefinitionOutput {
                    task_definition: dummy::described_task_definition(task_definition),
                },
            )
            .await?;
        Ok(output.task_definition)
    }

    /// Full task definition, ready to be registered as a new revision
    pub async fn describe_task_definition_document(&self, task_definition: &str) -> Result<Value> {
        let mut output: Value = self
            .execute(describe_task_definition_args(task_definition), || {
                serde_json::json!({
                    "taskDefinition": dummy::described_task_definition(task_definition)
                })
            })
            .await?;

        let described = output
            .get_mut("taskDefinition")
            .map(Value::take)
            .ok_or_else(|| {
                AwsError::UnexpectedOutput("describe-task-definition: no taskDefinition".to_string())
            })?;
        Ok(ecs::strip_read_only_fields(described))
    }

    pub async fn create_service(&self, request: &CreateService) -> Result<ServiceInfo> {
        let output: ServiceOutput = self
            .execute(create_service_args(request), || ServiceOutput {
                service: dummy::created_service(&request.document),
            })
            .await?;
        Ok(output.service)
    }

    pub async fn describe_service(&self, cluster: &str, service: &str) -> Result<ServiceInfo> {
        let output: ServicesOutput = self
            .execute(
                args(&[
                    "ecs",
                    "describe-services",
                    "--cluster",
                    cluster,
                    "--services",
                    service,
                    "--output",
                    "json",
                ]),
                || ServicesOutput {
                    services: vec![dummy::described_service(service)],
                    failures: Vec::new(),
                },
            )
            .await?;

        match output.services.into_iter().next() {
            Some(found) => Ok(found),
            None => {
                let reason = output
                    .failures
                    .into_iter()
                    .find_map(|f| f.reason)
                    .unwrap_or_else(|| "MISSING".to_string());
                Err(AwsError::NotFound(format!("service {}: {}", service, reason)))
            }
        }
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn cli_input(document: &Path) -> String {
    format!("file://{}", document.display())
}

fn with_document(command: &[&str], document: &Path) -> Vec<String> {
    let mut args = args(command);
    args.push("--cli-input-json".to_string());
    args.push(cli_input(document));
    args.push("--output".to_string());
    args.push("json".to_string());
    args
}

fn forward_action(target_group_arn: &str) -> String {
    format!("Type=forward,TargetGroupArn={}", target_group_arn)
}

fn create_listener_args(request: &CreateListener) -> Vec<String> {
    let mut args = with_document(&["elbv2", "create-listener"], &request.document);
    if let Some(arn) = non_empty(&request.load_balancer_arn) {
        args.push("--load-balancer-arn".to_string());
        args.push(arn.to_string());
    }
    if let Some(arn) = non_empty(&request.target_group_arn) {
        args.push("--default-actions".to_string());
        args.push(forward_action(arn));
    }
    args
}

fn create_rule_args(request: &CreateRule) -> Vec<String> {
    let mut args = with_document(&["elbv2", "create-rule"], &request.document);
    if let Some(arn) = non_empty(&request.listener_arn) {
        args.push("--listener-arn".to_string());
        args.push(arn.to_string());
    }
    if let Some(priority) = request.priority {
        args.push("--priority".to_string());
        args.push(priority.to_string());
    }
    if let Some(arn) = non_empty(&request.target_group_arn) {
        args.push("--actions".to_string());
        args.push(forward_action(arn));
    }
    args
}

fn describe_task_definition_args(task_definition: &str) -> Vec<String> {
    args(&[
        "ecs",
        "describe-task-definition",
        "--task-definition",
        task_definition,
        "--output",
        "json",
    ])
}

fn create_service_args(request: &CreateService) -> Vec<String> {
    let mut args = with_document(&["ecs", "create-service"], &request.document);
    if let Some(lb) = &request.load_balancer
        && !lb.target_group_arn.is_empty()
        && !lb.container_name.is_empty()
    {
        args.push("--load-balancers".to_string());
        args.push(format!(
            "targetGroupArn={},containerName={},containerPort={}",
            lb.target_group_arn, lb.container_name, lb.container_port
        ));
    }
    if let Some(seconds) = request.health_check_grace_period_seconds {
        args.push("--health-check-grace-period-seconds".to_string());
        args.push(seconds.to_string());
    }
    args
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn first<T>(items: Vec<T>, command: &str) -> Result<T> {
    items
        .into_iter()
        .next()
        .ok_or_else(|| AwsError::UnexpectedOutput(format!("{} returned no resource", command)))
}

/// Map the error text printed by the CLI to an error kind
fn classify_failure(stderr: &str) -> AwsError {
    let message = stderr.trim().to_string();
    if message.contains("AlreadyExists") {
        AwsError::AlreadyExists(message)
    } else if message.contains("NotFound") {
        AwsError::NotFound(message)
    } else {
        AwsError::CommandFailed(message)
    }
}

fn parse_output<T: DeserializeOwned>(output: &str) -> Result<T> {
    let trimmed = output.trim();
    let json = if trimmed.is_empty() { "null" } else { trimmed };
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecx_core::ServiceLoadBalancer;
    use std::path::PathBuf;

    #[test]
    fn test_create_listener_args() {
        let request = CreateListener {
            document: PathBuf::from("/project/listeners/https.json"),
            load_balancer_arn: Some("arn:lb".to_string()),
            target_group_arn: Some("arn:tg".to_string()),
        };

        assert_eq!(
            create_listener_args(&request),
            args(&[
                "elbv2",
                "create-listener",
                "--cli-input-json",
                "file:///project/listeners/https.json",
                "--output",
                "json",
                "--load-balancer-arn",
                "arn:lb",
                "--default-actions",
                "Type=forward,TargetGroupArn=arn:tg",
            ])
        );
    }

    #[test]
    fn test_empty_identifiers_are_not_passed() {
        let request = CreateListener {
            document: PathBuf::from("l.json"),
            load_balancer_arn: Some(String::new()),
            target_group_arn: None,
        };

        let args = create_listener_args(&request);
        assert!(!args.contains(&"--load-balancer-arn".to_string()));
        assert!(!args.contains(&"--default-actions".to_string()));
    }

    #[test]
    fn test_create_rule_args() {
        let request = CreateRule {
            document: PathBuf::from("rules/api.json"),
            listener_arn: Some("arn:listener".to_string()),
            target_group_arn: Some("arn:tg".to_string()),
            priority: Some(10),
        };

        let args = create_rule_args(&request);
        assert_eq!(
            &args[6..],
            &[
                "--listener-arn",
                "arn:listener",
                "--priority",
                "10",
                "--actions",
                "Type=forward,TargetGroupArn=arn:tg",
            ]
        );
    }

    #[test]
    fn test_create_service_args() {
        let request = CreateService {
            document: PathBuf::from("services/web.json"),
            load_balancer: Some(ServiceLoadBalancer {
                target_group_arn: "arn:tg".to_string(),
                container_name: "web".to_string(),
                container_port: 8080,
            }),
            health_check_grace_period_seconds: Some(60),
        };

        let args = create_service_args(&request);
        assert!(args.contains(&"targetGroupArn=arn:tg,containerName=web,containerPort=8080".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("60"));
    }

    #[test]
    fn test_global_options_appended() {
        let cli = AwsCli::new()
            .with_profile(Some("staging".to_string()))
            .with_region(Some(String::new()));

        let line = cli.command_line(args(&["logs", "create-log-group"]));
        assert_eq!(line, args(&["logs", "create-log-group", "--profile", "staging"]));
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure(
                "An error occurred (ResourceAlreadyExistsException) when calling the CreateLogGroup operation"
            ),
            AwsError::AlreadyExists(_)
        ));
        assert!(matches!(
            classify_failure(
                "An error occurred (TargetGroupNotFound) when calling the DescribeTargetGroups operation"
            ),
            AwsError::NotFound(_)
        ));
        assert!(matches!(
            classify_failure("An error occurred (AccessDenied)"),
            AwsError::CommandFailed(_)
        ));
    }

    #[test]
    fn test_parse_empty_output() {
        let value: Value = parse_output("\n").unwrap();
        assert!(value.is_null());
    }

    #[tokio::test]
    async fn test_dummy_mode_answers_without_process() {
        let cli = AwsCli::new().with_binary("/nonexistent/aws").with_dummy(true);

        let target_group = cli
            .create_target_group(Path::new("targetgroups/web.json"))
            .await
            .unwrap();
        assert_eq!(target_group.target_group_name, "web");
        assert!(cli.describe_target_groups("web").await.unwrap().is_empty());

        let service = cli.describe_service("main", "arn:service").await.unwrap();
        assert_eq!(
            ecs::extract_family_from_revision(service.current_task_definition().unwrap()),
            "dummy"
        );
    }

    #[tokio::test]
    async fn test_dummy_task_definition_document_is_registrable() {
        let cli = AwsCli::new().with_dummy(true);

        let document = cli.describe_task_definition_document("dummy").await.unwrap();
        assert_eq!(document["family"], "dummy");
        assert!(document.get("taskDefinitionArn").is_none());
        assert!(document.get("revision").is_none());
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let cli = AwsCli::new().with_binary("/nonexistent/path/to/aws");

        let result = cli.check_installed().await;
        assert!(matches!(result, Err(AwsError::AwsCliNotFound(_))));
    }
}
