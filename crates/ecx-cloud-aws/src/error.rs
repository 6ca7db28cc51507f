//! AWS gateway error types

use ecx_core::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws CLI not found ({0}). Please install: https://aws.amazon.com/cli/")]
    AwsCliNotFound(String),

    #[error("aws command failed: {0}")]
    CommandFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Unexpected aws output: {0}")]
    UnexpectedOutput(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<AwsError> for GatewayError {
    fn from(error: AwsError) -> Self {
        match error {
            AwsError::NotFound(message) => GatewayError::NotFound(message),
            AwsError::AlreadyExists(message) => GatewayError::AlreadyExists(message),
            other => GatewayError::Failed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_mapping() {
        assert_eq!(
            GatewayError::from(AwsError::NotFound("tg".to_string())),
            GatewayError::NotFound("tg".to_string())
        );
        assert_eq!(
            GatewayError::from(AwsError::AlreadyExists("/ecs/app".to_string())),
            GatewayError::AlreadyExists("/ecs/app".to_string())
        );
        assert_eq!(
            GatewayError::from(AwsError::CommandFailed("AccessDenied".to_string())),
            GatewayError::Failed("aws command failed: AccessDenied".to_string())
        );
    }
}
