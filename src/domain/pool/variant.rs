//! Reward accrual variants

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::infrastructure::chain::PoolContract;
use crate::shared::errors::PoolError;
use crate::shared::types::Amount;

/// How a pool pays out rewards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RewardVariant {
    /// Rewards are reinvested into the staked balance; nothing is claimable.
    AutoCompounding,
    /// Rewards accumulate on the contract and are claimed explicitly.
    #[default]
    Harvest,
}

impl RewardVariant {
    pub const AUTO_COMPOUNDING_TAG: &'static str = "auto-compounding";
    pub const HARVEST_TAG: &'static str = "harvest";

    /// Select the variant for a descriptor's pool-type tag.
    ///
    /// Anything other than `"auto-compounding"` gets harvest semantics,
    /// including an absent or unrecognized tag.
    pub fn from_pool_type(tag: Option<&str>) -> Self {
        match tag {
            Some(Self::AUTO_COMPOUNDING_TAG) => RewardVariant::AutoCompounding,
            None | Some(Self::HARVEST_TAG) => RewardVariant::Harvest,
            Some(other) => {
                warn!("Unknown pool type {:?}, falling back to harvest", other);
                RewardVariant::Harvest
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RewardVariant::AutoCompounding => Self::AUTO_COMPOUNDING_TAG,
            RewardVariant::Harvest => Self::HARVEST_TAG,
        }
    }

    /// Claimable rewards of `account` under this variant
    pub async fn earned_rewards(
        self,
        contract: &dyn PoolContract,
        account: Address,
    ) -> Result<Amount, PoolError> {
        match self {
            RewardVariant::AutoCompounding => Ok(Amount::ZERO),
            RewardVariant::Harvest => contract.earned(account).await,
        }
    }
}

impl fmt::Display for RewardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pool_type() {
        assert_eq!(
            RewardVariant::from_pool_type(Some("auto-compounding")),
            RewardVariant::AutoCompounding
        );
        assert_eq!(RewardVariant::from_pool_type(Some("harvest")), RewardVariant::Harvest);
        assert_eq!(RewardVariant::from_pool_type(None), RewardVariant::Harvest);
        assert_eq!(RewardVariant::from_pool_type(Some("boosted")), RewardVariant::Harvest);
        assert_eq!(RewardVariant::from_pool_type(Some("Auto-Compounding")), RewardVariant::Harvest);
    }

    #[test]
    fn test_tag_round_trip() {
        for variant in [RewardVariant::AutoCompounding, RewardVariant::Harvest] {
            assert_eq!(RewardVariant::from_pool_type(Some(variant.as_str())), variant);
        }
    }
}
