//! Stakepools - rewards pool client
//! Uniform balances, rewards, USD valuation and staking across pool variants

pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use domain::pool::{PoolSummary, RewardVariant, RewardsPool, RewardsPoolFactory};
pub use domain::registry::{Cohort, PoolRegistry};
pub use infrastructure::chain::{Connection, InMemoryChain, PoolContract, TokenAdapter};
pub use shared::errors::PoolError;
