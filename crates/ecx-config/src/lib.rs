pub mod error;
pub mod settings;

pub use error::*;
pub use settings::Settings;

use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a project file
pub const PROJECT_FILE_ENV: &str = "ECX_PROJECT_FILE";

/// Project file names, in search order
pub const PROJECT_FILE_CANDIDATES: &[&str] = &["ecx.yaml", "ecx.yml"];

/// Directory holding ecx settings (`~/.config/ecx`)
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("ecx"))
}

/// Find the project file to apply
///
/// Search order:
/// 1. `ECX_PROJECT_FILE` (direct path)
/// 2. `dir`: ecx.yaml, ecx.yml
/// 3. `dir/.ecx/`: ecx.yaml
pub fn find_project_file(dir: &Path) -> Result<PathBuf> {
    if let Ok(project_path) = std::env::var(PROJECT_FILE_ENV) {
        let path = PathBuf::from(project_path);
        if path.is_file() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points at a missing file: {}",
            PROJECT_FILE_ENV,
            path.display()
        );
    }

    for filename in PROJECT_FILE_CANDIDATES {
        let path = dir.join(filename);
        if path.is_file() {
            return Ok(path);
        }
    }

    let path = dir.join(".ecx").join("ecx.yaml");
    if path.is_file() {
        return Ok(path);
    }

    Err(ConfigError::ProjectFileNotFound(dir.to_path_buf()))
}

/// Directory relative document paths of a project file resolve against
pub fn project_dir(project_file: &Path) -> PathBuf {
    match project_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
