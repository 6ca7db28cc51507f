use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "Project file not found in {0}. Looked for:\n\
        - ecx.yaml, ecx.yml\n\
        - .ecx/ecx.yaml\n\
        The path can also be given with the ECX_PROJECT_FILE environment variable"
    )]
    ProjectFileNotFound(PathBuf),

    #[error("Invalid settings file {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
