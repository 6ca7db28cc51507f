use crate::commands::resolve_project_file;
use crate::progress::SpinnerReporter;
use colored::Colorize;
use ecx_cloud_aws::{AwsCli, AwsGateway};
use ecx_core::{Pipeline, load_project};
use std::path::Path;

pub async fn handle(project: Option<&Path>, aws: AwsCli) -> anyhow::Result<()> {
    let project_file = resolve_project_file(project)?;
    println!(
        "{} {}",
        "Project:".blue(),
        project_file.display().to_string().cyan()
    );

    let project = load_project(&project_file)?;
    if project.is_empty() {
        println!("{}", "Nothing to apply".yellow());
        return Ok(());
    }

    if aws.is_dummy() {
        println!("{}", "Dummy run: no aws call is made".yellow());
    } else {
        let version = aws.check_installed().await?;
        tracing::debug!("Using {}", version);
    }

    let gateway = AwsGateway::new(aws);
    let mut reporter = SpinnerReporter::new();
    let mut pipeline = Pipeline::new(&gateway, ecx_config::project_dir(&project_file));

    let report = pipeline.run(&project, &mut reporter).await?;

    println!();
    println!(
        "{} ({}, {}ms)",
        "Done".green().bold(),
        report.summary(),
        report.duration_ms
    );
    Ok(())
}
