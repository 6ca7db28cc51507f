//! ECS identifier helpers

use serde_json::Value;

const TASK_DEFINITION_ARN_MARKER: &str = ":task-definition/";

/// Fields `describe-task-definition` returns that `register-task-definition`
/// refuses as input
pub const READ_ONLY_TASK_DEFINITION_FIELDS: &[&str] = &[
    "taskDefinitionArn",
    "revision",
    "status",
    "requiresAttributes",
    "compatibilities",
    "registeredAt",
    "registeredBy",
    "deregisteredAt",
];

/// Family of a task definition revision
///
/// Accepts a full ARN (`arn:...:task-definition/web:5`) or `family:revision`.
///
/// ```
/// use ecx_cloud_aws::extract_family_from_revision;
///
/// assert_eq!(
///     extract_family_from_revision("arn:aws:ecs:us-east-1:123456789012:task-definition/webserver:5"),
///     "webserver"
/// );
/// assert_eq!(extract_family_from_revision("webserver:5"), "webserver");
/// ```
pub fn extract_family_from_revision(task_definition: &str) -> String {
    let name = match task_definition.rfind(TASK_DEFINITION_ARN_MARKER) {
        Some(pos) => &task_definition[pos + TASK_DEFINITION_ARN_MARKER.len()..],
        None => task_definition,
    };
    match name.rfind(':') {
        Some(pos) => name[..pos].to_string(),
        None => name.to_string(),
    }
}

/// Repository name of an ECR image URI, empty for images hosted elsewhere
///
/// `123456789012.dkr.ecr.us-west-2.amazonaws.com/team/web:1.2` gives `team/web`.
pub fn extract_repository_name(image: &str) -> String {
    let (Some(ecr), Some(domain), Some(slash)) =
        (image.find(".ecr."), image.find(".amazonaws."), image.find('/'))
    else {
        return String::new();
    };
    if !(ecr > 0 && ecr < domain && domain < slash) {
        return String::new();
    }

    let path = &image[slash + 1..];
    match path.find(':') {
        Some(pos) => path[..pos].to_string(),
        None => path.to_string(),
    }
}

/// Turn a described task definition into a document that can be registered
/// again as a new revision
pub fn strip_read_only_fields(mut task_definition: Value) -> Value {
    if let Some(object) = task_definition.as_object_mut() {
        for field in READ_ONLY_TASK_DEFINITION_FIELDS {
            object.remove(*field);
        }
    }
    task_definition
}
