use crate::commands::resolve_project_file;
use colored::Colorize;
use ecx_core::{Severity, load_project, validate_project};
use std::path::Path;

pub fn handle(project: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", "Validating project...".blue());

    let project_file = resolve_project_file(project)?;
    println!(
        "Project file: {}",
        project_file.display().to_string().cyan()
    );

    let project = match load_project(&project_file) {
        Ok(project) => project,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Invalid project file".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let issues = validate_project(&project, &ecx_config::project_dir(&project_file));
    let errors = issues.iter().filter(|i| i.is_error()).count();

    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("  {} {}", "✗".red(), issue.message),
            Severity::Warning => eprintln!("  {} {}", "!".yellow(), issue.message),
        }
    }

    if errors > 0 {
        eprintln!();
        eprintln!("{}", format!("✗ {} error(s) found", errors).red().bold());
        std::process::exit(1);
    }

    println!("{}", "✓ Project is valid".green().bold());
    println!();
    println!("Summary:");
    println!("  target groups:    {}", project.target_groups.len());
    println!("  load balancers:   {}", project.load_balancers.len());
    println!("  listeners:        {}", project.listeners.len());
    println!("  log groups:       {}", project.log_groups.len());
    println!("  task definitions: {}", project.task_definitions.len());
    println!("  flows:            {}", project.flows.len());
    for flow in &project.flows {
        println!("    - {}", flow.name.cyan());
    }

    Ok(())
}
