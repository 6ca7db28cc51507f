//! Ordered apply pipeline
//!
//! Categories are applied one after the other in [`APPLY_ORDER`], every
//! item of a category before the first item of the next one. Each created
//! or reused resource is registered under its key so that later categories
//! can resolve `ref:<key>` against it. The first error stops the run;
//! resources created so far are left in place.

use crate::document;
use crate::error::{ApplyError, Result};
use crate::gateway::{
    CreateListener, CreateRule, CreateService, Gateway, GatewayError, ServiceLoadBalancer,
    TargetGroup,
};
use crate::model::{
    Category, FlowSpec, FlowTargetGroup, ListenerSpec, LoadBalancerSpec, LogGroupSpec, Project,
    TargetGroupSpec, TaskDefinitionSpec,
};
use crate::port::{container_ports, select_load_balanced_port};
use crate::prober::Prober;
use crate::registry::{Namespace, Registry};
use crate::report::{ApplyReport, Reporter, Step, StepOutcome};
use crate::resolver::{resolve, resolve_optional};
use crate::validate::check_project;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Field of a service document naming its task definition
const SERVICE_TASK_DEFINITION_FIELDS: &[&str] = &["taskDefinition"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    TargetGroups,
    LoadBalancers,
    Listeners,
    LogGroups,
    TaskDefinitions,
    Flows,
}

/// Dependency order of the categories
pub const APPLY_ORDER: [Phase; 6] = [
    Phase::TargetGroups,
    Phase::LoadBalancers,
    Phase::Listeners,
    Phase::LogGroups,
    Phase::TaskDefinitions,
    Phase::Flows,
];

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::TargetGroups => write!(f, "target groups"),
            Phase::LoadBalancers => write!(f, "load balancers"),
            Phase::Listeners => write!(f, "listeners"),
            Phase::LogGroups => write!(f, "log groups"),
            Phase::TaskDefinitions => write!(f, "task definitions"),
            Phase::Flows => write!(f, "flows"),
        }
    }
}

/// One apply run
pub struct Pipeline<'a> {
    gateway: &'a dyn Gateway,
    /// Directory relative document paths are resolved against
    base_dir: PathBuf,
    registry: Registry,
}

impl<'a> Pipeline<'a> {
    pub fn new(gateway: &'a dyn Gateway, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            gateway,
            base_dir: base_dir.into(),
            registry: Registry::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn document(&self, value: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(value)
    }

    /// Apply every category of `project` in order
    pub async fn run(
        &mut self,
        project: &Project,
        reporter: &mut dyn Reporter,
    ) -> Result<ApplyReport> {
        check_project(project)?;

        let start = Instant::now();
        let mut report = ApplyReport::new();

        for phase in APPLY_ORDER {
            tracing::debug!("Applying {}", phase);
            let result = self.run_phase(phase, project, reporter, &mut report).await;
            report.duration_ms = start.elapsed().as_millis() as u64;
            result?;
        }

        tracing::info!(
            "Apply finished in {}ms: {}",
            report.duration_ms,
            report.summary()
        );
        Ok(report)
    }

    async fn run_phase(
        &mut self,
        phase: Phase,
        project: &Project,
        reporter: &mut dyn Reporter,
        report: &mut ApplyReport,
    ) -> Result<()> {
        match phase {
            Phase::TargetGroups => {
                for spec in &project.target_groups {
                    let step = Step::new(Category::TargetGroup, label(&spec.key, &spec.value));
                    reporter.started(&step);
                    let result = self.apply_target_group(spec).await;
                    finish(step, result, reporter, report)?;
                }
            }
            Phase::LoadBalancers => {
                for spec in &project.load_balancers {
                    let step = Step::new(Category::LoadBalancer, label(&spec.key, &spec.value));
                    reporter.started(&step);
                    let result = self.apply_load_balancer(spec).await;
                    finish(step, result, reporter, report)?;
                }
            }
            Phase::Listeners => {
                for spec in &project.listeners {
                    let step = Step::new(Category::Listener, label(&spec.key, &spec.value));
                    reporter.started(&step);
                    let result = self.apply_listener(spec, &step, reporter).await;
                    finish(step, result, reporter, report)?;
                }
            }
            Phase::LogGroups => {
                for spec in &project.log_groups {
                    let step = Step::new(Category::LogGroup, spec.group.as_str());
                    reporter.started(&step);
                    let result = self.apply_log_group(spec).await;
                    finish(step, result, reporter, report)?;
                }
            }
            Phase::TaskDefinitions => {
                for spec in &project.task_definitions {
                    let step = Step::new(Category::TaskDefinition, spec.value.as_str());
                    reporter.started(&step);
                    let result = self.apply_task_definition(spec).await;
                    finish(step, result, reporter, report)?;
                }
            }
            Phase::Flows => {
                for flow in &project.flows {
                    let step = Step::new(Category::Flow, flow.name.as_str());
                    reporter.started(&step);
                    let result = self.apply_flow(flow, &step, reporter).await;
                    finish(step, result, reporter, report)?;
                }
            }
        }
        Ok(())
    }

    async fn apply_target_group(&mut self, spec: &TargetGroupSpec) -> Result<StepOutcome> {
        if spec.value.is_empty() {
            return Ok(StepOutcome::Skipped);
        }

        let document = self.document(&spec.value);
        let (target_group, outcome) = self.create_or_reuse_target_group(&document).await?;
        self.registry
            .put(Namespace::TargetGroup, &spec.key, &target_group.arn)?;
        Ok(outcome)
    }

    async fn create_or_reuse_target_group(
        &self,
        document: &Path,
    ) -> Result<(TargetGroup, StepOutcome)> {
        if let Some(existing) = Prober::new(self.gateway)
            .find_existing_target_group(document)
            .await?
        {
            tracing::info!(
                "Target group '{}' already exists: {}",
                existing.name,
                existing.arn
            );
            return Ok((existing, StepOutcome::Reused));
        }

        let created = self
            .gateway
            .create_target_group(document)
            .await
            .map_err(ApplyError::remote(format!(
                "create target group {}",
                document.display()
            )))?;
        tracing::info!("Created target group: {}", created.arn);
        Ok((created, StepOutcome::Created))
    }

    async fn apply_load_balancer(&mut self, spec: &LoadBalancerSpec) -> Result<StepOutcome> {
        if spec.value.is_empty() {
            return Ok(StepOutcome::Skipped);
        }

        let document = self.document(&spec.value);
        let (load_balancer, outcome) = match Prober::new(self.gateway)
            .find_existing_load_balancer(&document)
            .await?
        {
            Some(existing) => {
                tracing::info!(
                    "Load balancer '{}' already exists: {}",
                    existing.name,
                    existing.arn
                );
                (existing, StepOutcome::Reused)
            }
            None => {
                let created = self
                    .gateway
                    .create_load_balancer(&document)
                    .await
                    .map_err(ApplyError::remote(format!(
                        "create load balancer {}",
                        spec.value
                    )))?;
                tracing::info!("Created load balancer: {}", created.arn);
                (created, StepOutcome::Created)
            }
        };

        self.registry
            .put(Namespace::LoadBalancer, &spec.key, &load_balancer.arn)?;
        Ok(outcome)
    }

    async fn apply_listener(
        &mut self,
        spec: &ListenerSpec,
        step: &Step,
        reporter: &mut dyn Reporter,
    ) -> Result<StepOutcome> {
        if spec.value.is_empty() {
            return Ok(StepOutcome::Skipped);
        }

        let load_balancer_arn = resolve_optional(
            &self.registry,
            Namespace::LoadBalancer,
            spec.load_balancer.as_ref(),
        )?;
        let target_group_arn = resolve_optional(
            &self.registry,
            Namespace::TargetGroup,
            spec.target_group.as_ref(),
        )?;

        let request = CreateListener {
            document: self.document(&spec.value),
            load_balancer_arn,
            target_group_arn: target_group_arn.clone(),
        };
        let listener = self
            .gateway
            .create_listener(&request)
            .await
            .map_err(ApplyError::remote(format!("create listener {}", spec.value)))?;
        tracing::info!("Created listener: {}", listener.arn);

        // Registered before the rules so a rule failure keeps the key usable
        self.registry
            .put(Namespace::Listener, &spec.key, &listener.arn)?;

        let total = spec.rules.len();
        for (index, rule) in spec.rules.iter().enumerate() {
            if rule.value.is_empty() {
                tracing::debug!(
                    "Skipping rule {}/{} of listener {}: no value",
                    index + 1,
                    total,
                    spec.value
                );
                continue;
            }
            reporter.progress(step, &rule_progress(index, total, &rule.value));

            let rule_target_group = match &rule.target_group {
                Some(value) => Some(resolve(&self.registry, Namespace::TargetGroup, value)?),
                None => target_group_arn.clone(),
            };
            let request = CreateRule {
                document: self.document(&rule.value),
                listener_arn: Some(listener.arn.clone()),
                target_group_arn: rule_target_group,
                priority: rule.priority,
            };
            let created = self
                .gateway
                .create_rule(&request)
                .await
                .map_err(ApplyError::remote(format!("create rule {}", rule.value)))?;
            tracing::info!("Created listener rule: {}", created.arn);
        }

        Ok(StepOutcome::Created)
    }

    async fn apply_log_group(&self, spec: &LogGroupSpec) -> Result<StepOutcome> {
        if spec.group.is_empty() {
            return Ok(StepOutcome::Skipped);
        }

        let outcome = match self.gateway.create_log_group(&spec.group).await {
            Ok(()) => {
                tracing::info!("Created log group: {}", spec.group);
                StepOutcome::Created
            }
            Err(GatewayError::AlreadyExists(_)) => {
                tracing::info!("Log group '{}' already exists", spec.group);
                StepOutcome::Reused
            }
            Err(e) => {
                return Err(ApplyError::remote(format!("create log group {}", spec.group))(e));
            }
        };

        if spec.retention > 0 {
            self.gateway
                .put_retention_policy(&spec.group, spec.retention)
                .await
                .map_err(ApplyError::remote(format!(
                    "put retention policy {}",
                    spec.group
                )))?;
            tracing::debug!("Retention of {} set to {} days", spec.group, spec.retention);
        }

        Ok(outcome)
    }

    async fn apply_task_definition(&self, spec: &TaskDefinitionSpec) -> Result<StepOutcome> {
        if spec.value.is_empty() {
            return Ok(StepOutcome::Skipped);
        }

        let registered = self
            .gateway
            .register_task_definition(&self.document(&spec.value))
            .await
            .map_err(ApplyError::remote(format!(
                "register task definition {}",
                spec.value
            )))?;
        tracing::info!("Registered task definition: {}", registered.arn);
        Ok(StepOutcome::Created)
    }

    async fn apply_flow(
        &mut self,
        flow: &FlowSpec,
        step: &Step,
        reporter: &mut dyn Reporter,
    ) -> Result<StepOutcome> {
        if flow.is_empty() {
            return Ok(StepOutcome::Skipped);
        }

        let target_group_arn = match &flow.target_group {
            None => None,
            Some(FlowTargetGroup::Existing(value)) => {
                Some(resolve(&self.registry, Namespace::TargetGroup, value)?)
            }
            Some(FlowTargetGroup::Document(path)) => {
                reporter.progress(step, &format!("target group {}", path.display()));
                let (target_group, _) = self
                    .create_or_reuse_target_group(&self.document(path))
                    .await?;
                if target_group.arn.is_empty() {
                    return Err(ApplyError::RemoteOperation {
                        step: format!("create target group {}", path.display()),
                        source: GatewayError::Failed("no target group ARN returned".to_string()),
                    });
                }
                Some(target_group.arn)
            }
        };

        let total = flow.rules.len();
        for (index, rule) in flow.rules.iter().enumerate() {
            if rule.value.is_empty() {
                tracing::debug!(
                    "Skipping rule {}/{} of flow {}: no value",
                    index + 1,
                    total,
                    flow.name
                );
                continue;
            }
            reporter.progress(step, &rule_progress(index, total, &rule.value));

            let listener_arn =
                resolve_optional(&self.registry, Namespace::Listener, rule.listener.as_ref())?;
            let request = CreateRule {
                document: self.document(&rule.value),
                listener_arn,
                target_group_arn: target_group_arn.clone(),
                priority: rule.priority,
            };
            let created = self
                .gateway
                .create_rule(&request)
                .await
                .map_err(ApplyError::remote(format!("create rule {}", rule.value)))?;
            tracing::info!("Created listener rule: {}", created.arn);
        }

        if let Some(service) = &flow.service {
            reporter.progress(step, &format!("service {}", service));
            let document = self.document(service);

            let load_balancer = match &target_group_arn {
                Some(arn) => self.service_load_balancer(&document, arn).await?,
                None => None,
            };
            let request = CreateService {
                document,
                load_balancer,
                health_check_grace_period_seconds: flow.health_check_grace_period_seconds,
            };
            let created = self
                .gateway
                .create_service(&request)
                .await
                .map_err(ApplyError::remote(format!("create service {}", service)))?;
            tracing::info!("Created service: {}", created.arn);
        }

        Ok(StepOutcome::Created)
    }

    /// Wire the service's container port to the flow's target group
    async fn service_load_balancer(
        &self,
        document: &Path,
        target_group_arn: &str,
    ) -> Result<Option<ServiceLoadBalancer>> {
        let Some(task_definition) =
            document::read_string_field(document, SERVICE_TASK_DEFINITION_FIELDS)?
        else {
            return Err(ApplyError::configuration(
                document,
                "missing \"taskDefinition\"",
            ));
        };
        tracing::debug!("Service task definition: {}", task_definition);

        let described = self
            .gateway
            .describe_task_definition(&task_definition)
            .await
            .map_err(ApplyError::remote(format!(
                "describe task definition {}",
                task_definition
            )))?;

        let ports = container_ports(&described);
        match select_load_balanced_port(&ports) {
            Some(port) => {
                tracing::debug!(
                    "Load balanced container: {}:{}",
                    port.container_name,
                    port.container_port
                );
                Ok(Some(ServiceLoadBalancer {
                    target_group_arn: target_group_arn.to_string(),
                    container_name: port.container_name.clone(),
                    container_port: port.container_port,
                }))
            }
            None => {
                tracing::warn!(
                    "Task definition {} has no port mappings, service is created without a load balancer",
                    task_definition
                );
                Ok(None)
            }
        }
    }
}

fn label(key: &str, value: &str) -> String {
    if key.is_empty() {
        value.to_string()
    } else {
        key.to_string()
    }
}

/// Report the outcome of a step and record it
fn finish(
    step: Step,
    result: Result<StepOutcome>,
    reporter: &mut dyn Reporter,
    report: &mut ApplyReport,
) -> Result<()> {
    match result {
        Ok(outcome) => {
            reporter.finished(&step, &outcome);
            report.push(step, outcome);
            Ok(())
        }
        Err(e) => {
            let outcome = StepOutcome::Failed(e.to_string());
            reporter.finished(&step, &outcome);
            report.push(step, outcome);
            Err(e)
        }
    }
}

fn rule_progress(index: usize, total: usize, value: &str) -> String {
    format!("{} {}/{}: {}", Category::ListenerRule, index + 1, total, value)
}
