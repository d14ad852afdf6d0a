//! Shared registry and chain state for pool tests

use std::sync::Arc;

use alloy_primitives::{address, Address, U256};

use super::RewardsPoolFactory;
use crate::domain::registry::{PoolRegistry, RegistryEntry};
use crate::infrastructure::chain::{ChainSnapshot, Connection, InMemoryChain, PoolState};
use crate::shared::types::{Amount, Asset, PoolDescriptor};
use crate::shared::utils::WEI_PER_UNIT;

pub const USER: Address = address!("00000000000000000000000000000000000000aa");
pub const OTHER: Address = address!("00000000000000000000000000000000000000bb");

pub const HARVEST_POOL: Address = address!("0000000000000000000000000000000000000001");
pub const AUTO_POOL: Address = address!("0000000000000000000000000000000000000002");
pub const PAST_POOL: Address = address!("0000000000000000000000000000000000000003");
pub const BOOSTED_POOL: Address = address!("0000000000000000000000000000000000000004");

pub const LP: Address = address!("0000000000000000000000000000000000000010");
pub const REWARD: Address = address!("0000000000000000000000000000000000000011");
pub const SHARE_LP: Address = address!("0000000000000000000000000000000000000012");

fn wad(n: u64) -> Amount {
    U256::from(n) * WEI_PER_UNIT
}

fn asset(address: Address, name: &str, symbol: &str) -> Asset {
    Asset {
        address,
        name: name.to_string(),
        symbol: symbol.to_string(),
        decimals: 18,
    }
}

fn entry(
    address: Address,
    name: Option<&str>,
    staked: Asset,
    pool_type: Option<&str>,
    active: bool,
    week: Option<u32>,
    historical: bool,
) -> RegistryEntry {
    RegistryEntry {
        descriptor: PoolDescriptor {
            address,
            name: name.map(str::to_string),
            asset: staked,
            reward_asset: asset(REWARD, "Reward", "RWD"),
            variant: None,
            pool_type: pool_type.map(str::to_string),
        },
        active,
        week,
        historical,
    }
}

/// Harvest (active, week 1), auto-compounding (inactive, week 2),
/// unknown tag (active, week 2) and one historical pool
pub fn registry() -> PoolRegistry {
    let lp = asset(LP, "LP Token", "LP");
    let share = asset(SHARE_LP, "Share LP", "sLP");
    PoolRegistry::from_entries(vec![
        entry(HARVEST_POOL, Some("LP Harvest"), lp.clone(), Some("harvest"), true, Some(1), false),
        entry(AUTO_POOL, None, share, Some("auto-compounding"), false, Some(2), false),
        entry(PAST_POOL, Some("Retired"), lp.clone(), None, false, None, true),
        entry(BOOSTED_POOL, None, lp, Some("boosted"), true, Some(2), false),
    ])
    .expect("fixture registry is valid")
}

/// LP at $3, share LP at $1 converting 1:2, reward at $5.
/// USER holds 100 LP and 10 share LP in its wallet.
pub fn snapshot() -> ChainSnapshot {
    let mut snapshot = ChainSnapshot {
        signer: Some(USER),
        ..ChainSnapshot::default()
    };

    let lp = snapshot.tokens.entry(LP).or_default();
    lp.usd_price = wad(3);
    lp.balances.insert(USER, U256::from(100u64));

    let share = snapshot.tokens.entry(SHARE_LP).or_default();
    share.usd_price = wad(1);
    share.share_rate = Some(wad(2));
    share.balances.insert(USER, U256::from(10u64));

    snapshot.tokens.entry(REWARD).or_default().usd_price = wad(5);

    let mut harvest = PoolState {
        total_supply: wad(8),
        ..PoolState::default()
    };
    harvest.stakes.insert(USER, wad(2));
    harvest.earned.insert(USER, wad(1));
    snapshot.pools.insert(HARVEST_POOL, harvest);

    let mut auto = PoolState {
        total_supply: wad(12),
        ..PoolState::default()
    };
    auto.stakes.insert(USER, wad(3));
    auto.earned.insert(USER, wad(7));
    snapshot.pools.insert(AUTO_POOL, auto);

    let mut boosted = PoolState::default();
    boosted.earned.insert(USER, wad(4));
    snapshot.pools.insert(BOOSTED_POOL, boosted);

    snapshot
}

pub fn setup(snapshot: ChainSnapshot) -> (InMemoryChain, RewardsPoolFactory, Arc<dyn Connection>) {
    setup_with(InMemoryChain::new(snapshot))
}

pub fn setup_with(chain: InMemoryChain) -> (InMemoryChain, RewardsPoolFactory, Arc<dyn Connection>) {
    let connection: Arc<dyn Connection> = Arc::new(chain.clone());
    let factory = RewardsPoolFactory::new(Arc::new(registry()));
    (chain, factory, connection)
}
