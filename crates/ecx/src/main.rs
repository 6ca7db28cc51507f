mod commands;
mod progress;

use clap::{Parser, Subcommand};
use ecx_cloud_aws::{AwsCli, DEFAULT_BINARY};
use ecx_config::Settings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ecx")]
#[command(
    about = "A helper for AWS ELB/ECS provisioning that uses the aws CLI under the hood",
    long_about = None
)]
struct Cli {
    /// Debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dummy run (no aws call)
    #[arg(long, global = true)]
    dummy: bool,

    /// aws CLI profile
    #[arg(long, global = true)]
    profile: Option<String>,

    /// AWS region
    #[arg(long, global = true)]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the resources of a project file, in dependency order
    Apply {
        /// Project file or directory (default: ecx.yaml in the current directory)
        #[arg(short, long, env = "ECX_PROJECT")]
        project: Option<PathBuf>,
    },
    /// Check a project file without calling AWS
    Validate {
        /// Project file or directory (default: ecx.yaml in the current directory)
        #[arg(short, long, env = "ECX_PROJECT")]
        project: Option<PathBuf>,
    },
    /// Export the latest task definition revision of a service for editing
    UpdateService {
        /// Cluster name
        #[arg(long)]
        cluster: String,
        /// ECS service name or ARN
        #[arg(long)]
        service: String,
        /// Where to write the task definition
        #[arg(short, long, default_value = "task_def.json")]
        output: PathBuf,
    },
    /// Show version
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Version needs neither settings nor a project file
    if matches!(cli.command, Commands::Version) {
        println!("ecx {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = Settings::load()?;
    let aws = AwsCli::new()
        .with_binary(
            settings
                .aws_binary
                .unwrap_or_else(|| DEFAULT_BINARY.to_string()),
        )
        .with_profile(cli.profile.or(settings.aws_profile))
        .with_region(cli.region.or(settings.aws_region))
        .with_dummy(cli.dummy || settings.dummy);

    match cli.command {
        Commands::Apply { project } => {
            commands::apply::handle(project.as_deref(), aws).await?;
        }
        Commands::Validate { project } => {
            commands::validate::handle(project.as_deref())?;
        }
        Commands::UpdateService {
            cluster,
            service,
            output,
        } => {
            commands::update_service::handle(&aws, &cluster, &service, &output).await?;
        }
        Commands::Version => {}
    }

    Ok(())
}
