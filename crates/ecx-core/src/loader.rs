//! Project file loading

use crate::error::{ApplyError, Result};
use crate::model::Project;
use std::path::Path;

/// Expected value of the `api` header
pub const API: &str = "ecx";

/// Supported value of the `apiVersion` header
pub const API_VERSION: &str = "0.1";

/// Parse project file content and check its header
pub fn parse_project(content: &str) -> Result<Project> {
    let project: Project = serde_yaml::from_str(content)?;

    if project.api != API {
        return Err(ApplyError::InvalidProject(format!(
            "value for \"api\" is not valid, expected \"{}\" (got \"{}\")",
            API, project.api
        )));
    }
    if project.api_version != API_VERSION {
        return Err(ApplyError::InvalidProject(format!(
            "value for \"apiVersion\" is not valid, expected \"{}\" (got \"{}\")",
            API_VERSION, project.api_version
        )));
    }

    tracing::debug!("Parsed project with {} entries", project.len());
    Ok(project)
}

/// Read and parse a project file from disk
pub fn load_project(path: &Path) -> Result<Project> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApplyError::configuration(path, e.to_string()))?;
    tracing::debug!("Loading project file: {}", path.display());
    parse_project(&content)
}
