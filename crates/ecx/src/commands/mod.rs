pub mod apply;
pub mod update_service;
pub mod validate;

use anyhow::Context;
use std::path::{Path, PathBuf};

/// Project file named by `--project`, or found in the current directory
///
/// `--project` may name the file itself or the directory holding it.
pub fn resolve_project_file(project: Option<&Path>) -> anyhow::Result<PathBuf> {
    match project {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(dir) => Ok(ecx_config::find_project_file(dir)?),
        None => {
            let current_dir =
                std::env::current_dir().context("cannot read the current directory")?;
            Ok(ecx_config::find_project_file(&current_dir)?)
        }
    }
}
