//! Existence probing
//!
//! Target groups and load balancers carry a unique name in their input
//! document. Looking that name up before creating makes re-running a
//! project idempotent: a resource that already exists is reused.

use crate::document;
use crate::error::{ApplyError, Result};
use crate::gateway::{Gateway, GatewayError, GatewayResult, LoadBalancer, TargetGroup};
use std::path::Path;

/// Fields holding the declared name of a target group document
pub const TARGET_GROUP_NAME_FIELDS: &[&str] = &["Name"];

/// Fields holding the declared name of a load balancer document
pub const LOAD_BALANCER_NAME_FIELDS: &[&str] = &["Name", "LoadBalancerName"];

/// Read-only lookups against the gateway
pub struct Prober<'a> {
    gateway: &'a dyn Gateway,
}

impl<'a> Prober<'a> {
    pub fn new(gateway: &'a dyn Gateway) -> Self {
        Self { gateway }
    }

    /// Existing target group with the name declared in `document`
    pub async fn find_existing_target_group(&self, document: &Path) -> Result<Option<TargetGroup>> {
        let Some(name) = document::read_string_field(document, TARGET_GROUP_NAME_FIELDS)? else {
            tracing::debug!("No declared name in {}, skipping probe", document.display());
            return Ok(None);
        };

        let found = absorb_not_found(self.gateway.describe_target_groups(&name).await)
            .map_err(ApplyError::remote(format!("describe target group {}", name)))?;

        Ok(found.into_iter().find(|tg| tg.name == name && !tg.arn.is_empty()))
    }

    /// Existing load balancer with the name declared in `document`
    pub async fn find_existing_load_balancer(
        &self,
        document: &Path,
    ) -> Result<Option<LoadBalancer>> {
        let Some(name) = document::read_string_field(document, LOAD_BALANCER_NAME_FIELDS)? else {
            tracing::debug!("No declared name in {}, skipping probe", document.display());
            return Ok(None);
        };

        let found = absorb_not_found(self.gateway.describe_load_balancers(&name).await)
            .map_err(ApplyError::remote(format!("describe load balancer {}", name)))?;

        Ok(found.into_iter().find(|lb| lb.name == name && !lb.arn.is_empty()))
    }
}

/// Describe-by-name APIs report unknown names as errors; that is a negative
/// lookup, not a failure.
fn absorb_not_found<T>(result: GatewayResult<Vec<T>>) -> GatewayResult<Vec<T>> {
    match result {
        Err(GatewayError::NotFound(message)) => {
            tracing::debug!("Probe found nothing: {}", message);
            Ok(Vec::new())
        }
        other => other,
    }
}
