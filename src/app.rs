// src/app.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use alloy_primitives::{Address, U256};
use stakepools::infrastructure::chain::ChainSnapshot;
use stakepools::{Cohort, Connection, InMemoryChain, PoolRegistry, RewardsPoolFactory};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub registry_path: String,
    pub snapshot_path: Option<String>,
    pub log_filter: String,
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Self {
        Self {
            registry_path: cfg.registry.path,
            snapshot_path: cfg.snapshot.map(|s| s.path),
            log_filter: cfg.logging.filter,
        }
    }

    pub fn from_cli_args(registry_path: String, snapshot_path: Option<String>) -> Self {
        Self {
            registry_path,
            snapshot_path,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Pools { cohort: Cohort },
    Summary { user: String, cohort: Cohort },
    Stake { pool: String, amount: Option<String>, approve_forever: bool },
}

#[derive(Debug, Serialize)]
struct PoolListing {
    address: Address,
    name: String,
    variant: String,
    active: bool,
}

pub async fn run(app_cfg: AppCfg, command: Command) -> Result<()> {
    info!("Loading registry from {}", app_cfg.registry_path);
    let registry = Arc::new(
        PoolRegistry::from_file(&app_cfg.registry_path)
            .with_context(|| format!("load registry {}", app_cfg.registry_path))?,
    );
    let chain = load_chain(app_cfg.snapshot_path.as_deref())?;
    let connection: Arc<dyn Connection> = Arc::new(chain);
    let factory = RewardsPoolFactory::new(registry);

    match command {
        Command::Pools { cohort } => {
            let listings: Vec<PoolListing> = factory
                .cohort(cohort, &connection)
                .iter()
                .map(|pool| PoolListing {
                    address: pool.address(),
                    name: pool.name().to_string(),
                    variant: pool.variant().to_string(),
                    active: pool.is_active(),
                })
                .collect();
            info!("{} pools in cohort {}", listings.len(), cohort);
            println!("{}", serde_json::to_string_pretty(&listings)?);
        }
        Command::Summary { user, cohort } => {
            let user = parse_address(&user)?;
            let mut summaries = Vec::new();
            for pool in factory.cohort(cohort, &connection) {
                summaries.push(pool.summary(user).await?);
            }
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        Command::Stake { pool, amount, approve_forever } => {
            let address = parse_address(&pool)?;
            let descriptor = factory
                .registry()
                .find(&address)
                .ok_or_else(|| anyhow::anyhow!("Pool {} is not in the registry", address))?
                .clone();
            let amount = amount.as_deref().map(parse_amount).transpose()?;

            let pool = factory.from_pool(&descriptor, &connection);
            match pool.approve_and_stake(amount, approve_forever).await? {
                Some(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
                None => info!("Nothing staked: wallet balance too low"),
            }
        }
    }

    Ok(())
}

fn load_chain(snapshot_path: Option<&str>) -> Result<InMemoryChain> {
    let Some(path) = snapshot_path else {
        return Ok(InMemoryChain::default());
    };
    info!("Loading chain snapshot from {}", path);
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    let snapshot = ChainSnapshot::from_json(&s).context("parse chain snapshot")?;
    Ok(InMemoryChain::new(snapshot))
}

fn parse_address(s: &str) -> Result<Address> {
    s.parse().map_err(|e| anyhow::anyhow!("Invalid address {}: {}", s, e))
}

fn parse_amount(s: &str) -> Result<U256> {
    s.parse().map_err(|e| anyhow::anyhow!("Invalid amount {}: {}", s, e))
}
