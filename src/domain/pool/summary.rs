use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::shared::types::{Amount, PoolDescriptor};

/// Point-in-time view of one account's position in a pool
///
/// Fields are read concurrently and are not pinned to a single block, so
/// they may reflect slightly different chain states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    pub address: Address,
    pub user: Address,
    pub pool: PoolDescriptor,
    pub is_active: bool,
    pub staked_balance: Amount,
    pub unstaked_balance: Amount,
    pub earned_rewards: Amount,
    pub percentage_ownership: String,
    pub usd_value_of: Amount,
    /// Only present when the staked asset converts shares to underlying units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_balance_of: Option<Amount>,
}
