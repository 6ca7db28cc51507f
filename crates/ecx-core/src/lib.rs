//! ecx core
//!
//! Declarative provisioning engine for a small set of AWS resources
//! (target groups, load balancers, listeners and their rules, log groups,
//! task definitions and ECS services).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────────────────────────────┐
//! │   ecx.yaml   │──▶│ loader  ──▶  Project  ──▶  validate         │
//! └──────────────┘   └───────────────────┬────────────────────────┘
//!                                        │
//! ┌──────────────────────────────────────▼────────────────────────┐
//! │                         Pipeline                               │
//! │  APPLY_ORDER: target groups → load balancers → listeners →     │
//! │               log groups → task definitions → flows            │
//! │                                                                │
//! │   Prober ──▶ Gateway (create) ──▶ Registry ◀── resolver        │
//! └──────────────────────────────────────┬────────────────────────┘
//!                                        │
//!                              ┌─────────▼─────────┐
//!                              │  trait Gateway    │  (ecx-cloud-aws)
//!                              └───────────────────┘
//! ```
//!
//! Cross references between resources use the `ref:<key>` syntax and are
//! resolved against a [`Registry`] that only lives for one apply run.

pub mod document;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod port;
pub mod prober;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod validate;

#[cfg(test)]
mod testing;

// Re-exports
pub use error::{ApplyError, Result};
pub use gateway::{
    ContainerDefinition, CreateListener, CreateRule, CreateService, Gateway, GatewayError,
    GatewayResult, Listener, ListenerRule, LoadBalancer, PortMapping, Service,
    ServiceLoadBalancer, TargetGroup, TaskDefinition,
};
pub use loader::{API, API_VERSION, load_project, parse_project};
pub use model::{
    Category, FlowRuleSpec, FlowSpec, FlowTargetGroup, ListenerRuleSpec, ListenerSpec,
    LoadBalancerSpec, LogGroupSpec, Project, REF_PREFIX, ResourceRef, TargetGroupSpec,
    TaskDefinitionSpec,
};
pub use pipeline::{APPLY_ORDER, Phase, Pipeline};
pub use port::{ContainerPort, container_ports, select_load_balanced_port};
pub use prober::Prober;
pub use registry::{Namespace, Registry};
pub use report::{
    ApplyReport, NullReporter, Reporter, ReportSummary, Step, StepOutcome, StepRecord,
};
pub use validate::{Severity, ValidationIssue, check_project, validate_project};
