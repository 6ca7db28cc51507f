//! AWS gateway for ecx
//!
//! Implements the [`ecx_core::Gateway`] trait by driving the `aws` CLI.
//!
//! # Requirements
//!
//! - `aws` CLI v2 must be installed
//! - Credentials are resolved by the CLI itself (profile, environment,
//!   instance role)
//!
//! # Example
//!
//! ```ignore
//! use ecx_cloud_aws::{AwsCli, AwsGateway};
//! use ecx_core::{NullReporter, Pipeline, load_project};
//!
//! let cli = AwsCli::new().with_profile(Some("staging".into()));
//! cli.check_installed().await?;
//!
//! let gateway = AwsGateway::new(cli);
//! let project = load_project(Path::new("ecx.yaml"))?;
//! Pipeline::new(&gateway, ".").run(&project, &mut NullReporter).await?;
//! ```

pub mod aws_cli;
pub mod dummy;
pub mod ecs;
pub mod error;
pub mod gateway;
pub mod types;

pub use aws_cli::{AwsCli, DEFAULT_BINARY};
pub use ecs::{extract_family_from_revision, extract_repository_name, strip_read_only_fields};
pub use error::{AwsError, Result};
pub use gateway::AwsGateway;
pub use types::{DeploymentInfo, ServiceInfo, TaskDefinitionInfo};
