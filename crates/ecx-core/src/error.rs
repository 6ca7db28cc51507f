//! Core error types

use crate::gateway::GatewayError;
use crate::registry::Namespace;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop an apply run
#[derive(Error, Debug)]
pub enum ApplyError {
    /// A `ref:<key>` has no identifier in the registry
    #[error("unresolved reference 'ref:{key}' ({namespace} namespace)")]
    MissingReference { namespace: Namespace, key: String },

    /// The gateway rejected a remote operation
    #[error("{step} failed: {source}")]
    RemoteOperation {
        step: String,
        #[source]
        source: GatewayError,
    },

    /// A resource document could not be read before submission
    #[error("configuration error: {path}\nreason: {message}")]
    Configuration { path: PathBuf, message: String },

    #[error("duplicate key '{key}' ({namespace} namespace)")]
    DuplicateKey { namespace: Namespace, key: String },

    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ApplyError {
    /// Build a closure that wraps a gateway error with the step that raised it
    pub fn remote(step: impl Into<String>) -> impl FnOnce(GatewayError) -> ApplyError {
        let step = step.into();
        move |source| ApplyError::RemoteOperation { step, source }
    }

    pub fn configuration(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ApplyError::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApplyError>;
