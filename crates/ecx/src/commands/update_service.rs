use anyhow::Context;
use colored::Colorize;
use ecx_cloud_aws::{AwsCli, extract_family_from_revision, extract_repository_name};
use serde_json::Value;
use std::path::Path;

pub async fn handle(
    aws: &AwsCli,
    cluster: &str,
    service: &str,
    output: &Path,
) -> anyhow::Result<()> {
    println!("cluster: {}", cluster.cyan());
    println!("service: {}", service.cyan());

    let described = aws
        .describe_service(cluster, service)
        .await
        .with_context(|| format!("cannot describe service {}", service))?;

    let Some(current) = described.current_task_definition() else {
        anyhow::bail!("service {} has no deployment", service);
    };
    let family = extract_family_from_revision(current);
    println!("current task definition: {}", current);

    // The family alone resolves to its latest ACTIVE revision
    let document = aws
        .describe_task_definition_document(&family)
        .await
        .with_context(|| format!("cannot describe task definition {}", family))?;

    if let Some(containers) = document
        .get("containerDefinitions")
        .and_then(Value::as_array)
    {
        for container in containers {
            let name = container.get("name").and_then(Value::as_str).unwrap_or("");
            let image = container.get("image").and_then(Value::as_str).unwrap_or("");
            let repository = extract_repository_name(image);
            if repository.is_empty() {
                println!("  - {} {}", name.cyan(), image);
            } else {
                println!("  - {} {} (ECR: {})", name.cyan(), image, repository);
            }
        }
    }

    let json = serde_json::to_string_pretty(&document)?;
    std::fs::write(output, format!("{}\n", json))
        .with_context(|| format!("cannot write {}", output.display()))?;

    println!(
        "{} latest revision of {} written to {}",
        "✓".green(),
        family.cyan(),
        output.display()
    );
    Ok(())
}
