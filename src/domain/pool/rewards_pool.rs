//! Rewards pool bound to a live contract handle

use std::fmt;
use std::sync::Arc;

use alloy_primitives::Address;
use futures::try_join;
use tracing::{debug, info};

use super::summary::PoolSummary;
use super::variant::RewardVariant;
use crate::domain::registry::PoolRegistry;
use crate::infrastructure::chain::{Connection, PoolContract, TokenAdapter};
use crate::shared::errors::PoolError;
use crate::shared::types::{Amount, PoolDescriptor, TransactionReceipt};
use crate::shared::utils::{format_fixed, ratio_wad, MAX_UINT};

/// Precision used to render an 18-decimal ratio as a percentage
const PERCENT_DECIMALS: u8 = 16;
/// Characters of the formatted percentage kept before the `%` sign
const PERCENT_WIDTH: usize = 5;

/// Uniform read/write surface over one staking pool
pub struct RewardsPool {
    descriptor: PoolDescriptor,
    name: String,
    variant: RewardVariant,
    contract: Arc<dyn PoolContract>,
    lptoken: Arc<dyn TokenAdapter>,
    reward: Arc<dyn TokenAdapter>,
    connection: Arc<dyn Connection>,
    registry: Arc<PoolRegistry>,
}

impl RewardsPool {
    pub fn new(
        descriptor: PoolDescriptor,
        variant: RewardVariant,
        connection: Arc<dyn Connection>,
        registry: Arc<PoolRegistry>,
    ) -> Self {
        let contract = connection.pool_contract(&descriptor);
        let lptoken = connection.token(&descriptor.asset);
        let reward = connection.token(&descriptor.reward_asset);
        let name = descriptor.name.clone().unwrap_or_else(|| lptoken.name());

        Self {
            descriptor,
            name,
            variant,
            contract,
            lptoken,
            reward,
            connection,
            registry,
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &PoolDescriptor {
        &self.descriptor
    }

    pub fn variant(&self) -> RewardVariant {
        self.variant
    }

    pub fn contract(&self) -> &Arc<dyn PoolContract> {
        &self.contract
    }

    /// Adapter for the staked asset
    pub fn lptoken(&self) -> &Arc<dyn TokenAdapter> {
        &self.lptoken
    }

    /// Adapter for the reward asset
    pub fn reward(&self) -> &Arc<dyn TokenAdapter> {
        &self.reward
    }

    /// Amount of the staked asset `account` has in the pool
    pub async fn staked_balance(&self, account: Address) -> Result<Amount, PoolError> {
        self.contract.balance_of(account).await
    }

    /// Amount of the staked asset `account` holds in its wallet
    pub async fn unstaked_balance(&self, account: Address) -> Result<Amount, PoolError> {
        self.lptoken.balance_of(account).await
    }

    /// Staked balance converted to underlying units.
    ///
    /// `None` when the staked asset has no share conversion; that means
    /// "not applicable", not zero.
    pub async fn underlying_balance_of(&self, account: Address) -> Result<Option<Amount>, PoolError> {
        if !self.lptoken.supports_share_conversion() {
            return Ok(None);
        }
        let staked = self.staked_balance(account).await?;
        let underlying = self.lptoken.calc_share(staked, true).await?;
        Ok(Some(underlying))
    }

    pub async fn earned_rewards(&self, account: Address) -> Result<Amount, PoolError> {
        self.variant.earned_rewards(self.contract.as_ref(), account).await
    }

    /// USD value of the staked balance plus earned rewards
    pub async fn usd_value_of(&self, account: Address) -> Result<Amount, PoolError> {
        let (staked, earned) = try_join!(self.staked_balance(account), self.earned_rewards(account))?;
        let (staked_usd, earned_usd) = try_join!(
            self.lptoken.usd_value_of(staked),
            self.reward.usd_value_of(earned)
        )?;
        staked_usd.checked_add(earned_usd).ok_or(PoolError::Overflow)
    }

    /// Share of the pool's total supply that `amount` represents, e.g. `"25.00%"`.
    ///
    /// The string is cut to a fixed width, not rounded; it is for display only.
    pub async fn percentage_of_total(&self, amount: Amount) -> Result<String, PoolError> {
        if amount.is_zero() {
            return Ok("0%".to_string());
        }
        let total = self.contract.total_supply().await?;
        if total.is_zero() {
            return Ok("0%".to_string());
        }

        let ratio = ratio_wad(amount, total)?;
        let formatted = format_fixed(ratio, PERCENT_DECIMALS)?;
        let truncated: String = formatted.chars().take(PERCENT_WIDTH).collect();
        Ok(format!("{}%", truncated))
    }

    pub async fn percentage_ownership(&self, account: Address) -> Result<String, PoolError> {
        let staked = self.staked_balance(account).await?;
        self.percentage_of_total(staked).await
    }

    /// Registry lookup; not derived from chain state
    pub fn is_active(&self) -> bool {
        self.registry.is_address_active(&self.descriptor.address)
    }

    /// Aggregate every per-account figure for `user`
    pub async fn summary(&self, user: Address) -> Result<PoolSummary, PoolError> {
        debug!("Building summary for {} in pool {}", user, self.address());

        let (
            staked_balance,
            unstaked_balance,
            earned_rewards,
            underlying_balance_of,
            percentage_ownership,
            usd_value_of,
        ) = try_join!(
            self.staked_balance(user),
            self.unstaked_balance(user),
            self.earned_rewards(user),
            self.underlying_balance_of(user),
            self.percentage_ownership(user),
            self.usd_value_of(user)
        )?;

        Ok(PoolSummary {
            address: self.address(),
            user,
            pool: self.descriptor.clone(),
            is_active: self.is_active(),
            staked_balance,
            unstaked_balance,
            earned_rewards,
            percentage_ownership,
            usd_value_of,
            underlying_balance_of,
        })
    }

    /// Approve the pool to spend the staked asset if needed, then stake.
    ///
    /// A missing or zero `amount` stakes the whole wallet balance. Returns
    /// `Ok(None)` without submitting anything when the wallet holds less than
    /// `amount`. The stake is submitted right after the approval, without
    /// waiting for the approval to be confirmed.
    pub async fn approve_and_stake(
        &self,
        amount: Option<Amount>,
        approve_forever: bool,
    ) -> Result<Option<TransactionReceipt>, PoolError> {
        let caller = self.connection.signer().ok_or(PoolError::NoSigner)?;
        let pool = self.address();

        let (allowance, balance) = try_join!(
            self.lptoken.allowance(caller, pool),
            self.lptoken.balance_of(caller)
        )?;

        let amount = match amount {
            Some(amount) if !amount.is_zero() => amount,
            _ => balance,
        };

        if balance < amount {
            info!(
                "Skipping stake into {}: wallet balance {} is below {}",
                pool, balance, amount
            );
            return Ok(None);
        }

        let approval = async {
            if approve_forever || allowance < balance {
                let approved = if approve_forever { MAX_UINT } else { amount };
                info!("Approving {} of {} for {}", approved, self.lptoken.symbol(), pool);
                self.lptoken.approve(pool, approved).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let stake = async {
            info!("Staking {} into {}", amount, pool);
            self.contract.stake(amount).await
        };
        let (approval_tx, stake_tx) = try_join!(approval, stake)?;

        if let Some(tx) = approval_tx {
            self.connection.confirm(&tx).await?;
        }
        let receipt = self.connection.confirm(&stake_tx).await?;
        info!("Stake {} included in block {}", receipt.transaction_hash, receipt.block_number);
        Ok(Some(receipt))
    }
}

impl fmt::Debug for RewardsPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewardsPool")
            .field("address", &self.descriptor.address)
            .field("name", &self.name)
            .field("variant", &self.variant)
            .finish()
    }
}
