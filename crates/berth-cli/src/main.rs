use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "berth",
    about = "Berth: rank cluster nodes for a workload",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Scheduler configuration (scheduler.toml). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the nodes of a cluster snapshot for a workload request.
    ///
    /// Snapshot and request files are TOML, or JSON when they end in `.json`.
    Select {
        /// Cluster snapshot file
        #[arg(long)]
        cluster: PathBuf,
        /// Workload request file
        #[arg(long)]
        request: PathBuf,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Show the configured strategy, filter chain, and the expressions
    /// each filter would evaluate for a request.
    Explain {
        /// Workload request file
        #[arg(long)]
        request: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    let output = match cli.command {
        Commands::Select {
            cluster,
            request,
            format,
        } => commands::select::select(&config, &cluster, &request, &format)?,
        Commands::Explain { request } => commands::explain::explain(&config, &request)?,
    };
    println!("{output}");

    Ok(())
}
