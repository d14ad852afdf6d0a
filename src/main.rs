mod app;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stakepools::Cohort;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Inspect and stake into rewards pools")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Path to the pool registry (overrides config)
    #[arg(long)]
    registry: Option<String>,

    /// Path to a JSON chain snapshot (overrides config)
    #[arg(long)]
    snapshot: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List the pools of a cohort
    Pools {
        #[arg(long, default_value = "known")]
        cohort: Cohort,
    },
    /// Print per-pool summaries for an account
    Summary {
        /// Account address
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "known")]
        cohort: Cohort,
    },
    /// Approve if needed and stake into a pool
    Stake {
        /// Pool address
        #[arg(long)]
        pool: String,
        /// Amount in base units; defaults to the whole wallet balance
        #[arg(long)]
        amount: Option<String>,
        /// Approve an unlimited allowance
        #[arg(long)]
        approve_forever: bool,
    },
}

impl From<CliCommand> for app::Command {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Pools { cohort } => app::Command::Pools { cohort },
            CliCommand::Summary { user, cohort } => app::Command::Summary { user, cohort },
            CliCommand::Stake { pool, amount, approve_forever } => {
                app::Command::Stake { pool, amount, approve_forever }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Priority: CLI args > Config file > Defaults
    let app_cfg = if let Some(config_path) = &args.config {
        let mut app_cfg = app::AppCfg::from_config(config::Config::from_file(config_path)?);
        if let Some(registry) = args.registry {
            app_cfg.registry_path = registry;
        }
        if let Some(snapshot) = args.snapshot {
            app_cfg.snapshot_path = Some(snapshot);
        }
        app_cfg
    } else {
        let registry = args
            .registry
            .ok_or_else(|| anyhow::anyhow!("--registry is required when not using --config"))?;
        app::AppCfg::from_cli_args(registry, args.snapshot)
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&app_cfg.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    app::run(app_cfg, args.command.into()).await
}
