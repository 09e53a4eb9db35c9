use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kubectl_apidocs::{
    commands,
    config::AppConfig,
    ctx::{AppContext, Origin},
    logging,
};

/// API resources explained in a tree view format.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Configuration file [default: .apidocs.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the kubeconfig file
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    /// Saved `/openapi/v2` document, used instead of the cluster
    #[arg(long, global = true, requires = "discovery")]
    openapi: Option<PathBuf>,

    /// Saved discovery document, used instead of the cluster
    #[arg(long, global = true, requires = "openapi")]
    discovery: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the field paths of every resource
    Paths {
        /// Only print paths matching this regular expression
        #[arg(long)]
        filter: Option<String>,
        /// Only print paths of this resource
        #[arg(long)]
        resource: Option<String>,
    },
    /// Print the documentation of a resource or field, e.g. `deploy.spec.replicas`
    Explain { path: String },
}

impl Cli {
    fn origin(&self) -> Origin {
        match (&self.openapi, &self.discovery) {
            (Some(openapi), Some(discovery)) => Origin::Files {
                openapi: openapi.clone(),
                discovery: discovery.clone(),
            },
            _ => Origin::Cluster {
                kubeconfig: self.kubeconfig.clone(),
                context: self.context.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).await?;
    let interactive = cli.command.is_none();
    logging::init(interactive, config.log_file.as_deref())
        .context("Failed to initialise logging")?;

    let mut ctx = AppContext::new(config, cli.origin());
    let priority = ctx.config.priority_groups.clone();
    match cli.command {
        None => {
            ctx.show_progress = true;
            commands::browse(&ctx).await
        }
        Some(Command::Paths { filter, resource }) => {
            let snapshot = ctx.snapshot().await?;
            let paths = commands::field_paths(
                &snapshot,
                &priority,
                filter.as_deref(),
                resource.as_deref(),
            )?;
            for path in paths {
                println!("{path}");
            }
            Ok(())
        }
        Some(Command::Explain { path }) => {
            let snapshot = ctx.snapshot().await?;
            print!("{}", commands::explain(&snapshot, &priority, &path)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_offline_flags_go_together() {
        assert!(Cli::try_parse_from(["kubectl-apidocs", "--openapi", "a.json"]).is_err());
        let cli = Cli::try_parse_from([
            "kubectl-apidocs",
            "--openapi",
            "a.json",
            "--discovery",
            "d.json",
            "explain",
            "po.spec",
        ])
        .unwrap();
        assert!(matches!(cli.origin(), Origin::Files { .. }));
        assert!(matches!(cli.command, Some(Command::Explain { ref path }) if path == "po.spec"));
    }
}
