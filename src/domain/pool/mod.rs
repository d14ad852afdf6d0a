//! Pool domain - rewards pools and their construction

mod factory;
mod rewards_pool;
mod summary;
mod variant;

#[cfg(test)]
pub(crate) mod fixtures;

pub use factory::RewardsPoolFactory;
pub use rewards_pool::RewardsPool;
pub use summary::PoolSummary;
pub use variant::RewardVariant;
