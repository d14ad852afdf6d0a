//! In-memory chain for offline runs and tests
//!
//! Serves reads from a [`ChainSnapshot`], records every submitted transaction
//! in order and applies approvals and stakes when they are confirmed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{Connection, PoolContract, TokenAdapter};
use crate::shared::errors::PoolError;
use crate::shared::types::{
    Amount, Asset, PendingTransaction, PoolDescriptor, TransactionKind, TransactionReceipt,
};
use crate::shared::utils::{MAX_UINT, WEI_PER_UNIT};

/// Token state in a snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenState {
    #[serde(default)]
    pub balances: HashMap<Address, Amount>,
    /// owner -> spender -> amount
    #[serde(default)]
    pub allowances: HashMap<Address, HashMap<Address, Amount>>,
    /// USD per whole token, 18-decimal fixed point
    #[serde(default)]
    pub usd_price: Amount,
    /// Underlying units per share, 18-decimal fixed point. Absent for plain tokens.
    #[serde(default)]
    pub share_rate: Option<Amount>,
    /// Make every pricing call fail
    #[serde(default)]
    pub price_unavailable: bool,
}

/// Pool contract state in a snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolState {
    #[serde(default)]
    pub stakes: HashMap<Address, Amount>,
    #[serde(default)]
    pub total_supply: Amount,
    #[serde(default)]
    pub earned: HashMap<Address, Amount>,
}

/// Point-in-time chain state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainSnapshot {
    #[serde(default)]
    pub signer: Option<Address>,
    #[serde(default)]
    pub block_number: u64,
    #[serde(default)]
    pub tokens: HashMap<Address, TokenState>,
    #[serde(default)]
    pub pools: HashMap<Address, PoolState>,
}

impl ChainSnapshot {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[derive(Debug, Default)]
struct ChainState {
    snapshot: ChainSnapshot,
    /// pool address -> staked token address
    pool_assets: HashMap<Address, Address>,
    submitted: Vec<PendingTransaction>,
    nonce: u64,
}

impl ChainState {
    fn submit(&mut self, from: Address, to: Address, kind: TransactionKind) -> PendingTransaction {
        self.nonce += 1;
        let tx = PendingTransaction {
            hash: B256::left_padding_from(&self.nonce.to_be_bytes()),
            from,
            to,
            kind,
        };
        self.submitted.push(tx.clone());
        tx
    }

    /// Apply a stake; returns false when the chain would revert it
    fn apply_stake(&mut self, pool: Address, from: Address, amount: Amount) -> bool {
        let Some(token) = self.pool_assets.get(&pool).copied() else {
            return false;
        };
        let token_state = self.snapshot.tokens.entry(token).or_default();
        let balance = token_state.balances.get(&from).copied().unwrap_or_default();
        let allowance = token_state
            .allowances
            .get(&from)
            .and_then(|spenders| spenders.get(&pool))
            .copied()
            .unwrap_or_default();
        if balance < amount || allowance < amount {
            return false;
        }

        token_state.balances.insert(from, balance - amount);
        if allowance != MAX_UINT {
            token_state
                .allowances
                .entry(from)
                .or_default()
                .insert(pool, allowance - amount);
        }

        let pool_state = self.snapshot.pools.entry(pool).or_default();
        let staked = pool_state.stakes.entry(from).or_default();
        *staked = staked.saturating_add(amount);
        pool_state.total_supply = pool_state.total_supply.saturating_add(amount);
        true
    }
}

/// Shared in-memory chain; clones observe the same state
#[derive(Debug, Clone, Default)]
pub struct InMemoryChain {
    state: Arc<Mutex<ChainState>>,
}

fn lock(state: &Mutex<ChainState>) -> Result<MutexGuard<'_, ChainState>, PoolError> {
    state
        .lock()
        .map_err(|_| PoolError::Upstream("in-memory chain state poisoned".to_string()))
}

impl InMemoryChain {
    pub fn new(snapshot: ChainSnapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChainState {
                snapshot,
                ..ChainState::default()
            })),
        }
    }

    /// Replace the bound signer
    pub fn with_signer(self, signer: Option<Address>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.snapshot.signer = signer;
        }
        self
    }

    /// Transactions submitted so far, in submission order
    pub fn submitted(&self) -> Vec<PendingTransaction> {
        self.state
            .lock()
            .map(|state| state.submitted.clone())
            .unwrap_or_default()
    }

    /// Copy of the current chain state
    pub fn snapshot(&self) -> ChainSnapshot {
        self.state
            .lock()
            .map(|state| state.snapshot.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connection for InMemoryChain {
    fn signer(&self) -> Option<Address> {
        self.state.lock().ok().and_then(|state| state.snapshot.signer)
    }

    fn pool_contract(&self, descriptor: &PoolDescriptor) -> Arc<dyn PoolContract> {
        if let Ok(mut state) = self.state.lock() {
            state
                .pool_assets
                .insert(descriptor.address, descriptor.asset.address);
        }
        Arc::new(InMemoryPool {
            address: descriptor.address,
            state: Arc::clone(&self.state),
        })
    }

    fn token(&self, asset: &Asset) -> Arc<dyn TokenAdapter> {
        let supports_share_conversion = self
            .state
            .lock()
            .ok()
            .and_then(|state| {
                state
                    .snapshot
                    .tokens
                    .get(&asset.address)
                    .map(|token| token.share_rate.is_some())
            })
            .unwrap_or(false);
        Arc::new(InMemoryToken {
            asset: asset.clone(),
            supports_share_conversion,
            state: Arc::clone(&self.state),
        })
    }

    async fn confirm(&self, tx: &PendingTransaction) -> Result<TransactionReceipt, PoolError> {
        let mut state = lock(&self.state)?;
        if !state.submitted.iter().any(|submitted| submitted.hash == tx.hash) {
            return Err(PoolError::Upstream(format!("unknown transaction {}", tx.hash)));
        }

        let status = match tx.kind {
            TransactionKind::Approve { spender, amount } => {
                state
                    .snapshot
                    .tokens
                    .entry(tx.to)
                    .or_default()
                    .allowances
                    .entry(tx.from)
                    .or_default()
                    .insert(spender, amount);
                true
            }
            TransactionKind::Stake { amount } => state.apply_stake(tx.to, tx.from, amount),
        };

        state.snapshot.block_number += 1;
        debug!("Confirmed {} in block {} (status {})", tx.hash, state.snapshot.block_number, status);
        Ok(TransactionReceipt {
            transaction_hash: tx.hash,
            block_number: state.snapshot.block_number,
            status,
        })
    }
}

struct InMemoryToken {
    asset: Asset,
    supports_share_conversion: bool,
    state: Arc<Mutex<ChainState>>,
}

impl InMemoryToken {
    fn read<T>(&self, f: impl FnOnce(&TokenState) -> T) -> Result<T, PoolError>
    where
        T: Default,
    {
        let state = lock(&self.state)?;
        Ok(state
            .snapshot
            .tokens
            .get(&self.asset.address)
            .map(f)
            .unwrap_or_default())
    }
}

#[async_trait]
impl TokenAdapter for InMemoryToken {
    fn name(&self) -> String {
        self.asset.name.clone()
    }

    fn symbol(&self) -> String {
        self.asset.symbol.clone()
    }

    async fn balance_of(&self, account: Address) -> Result<Amount, PoolError> {
        self.read(|token| token.balances.get(&account).copied().unwrap_or_default())
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<Amount, PoolError> {
        self.read(|token| {
            token
                .allowances
                .get(&owner)
                .and_then(|spenders| spenders.get(&spender))
                .copied()
                .unwrap_or_default()
        })
    }

    async fn approve(&self, spender: Address, amount: Amount) -> Result<PendingTransaction, PoolError> {
        let mut state = lock(&self.state)?;
        let from = state.snapshot.signer.ok_or(PoolError::NoSigner)?;
        Ok(state.submit(from, self.asset.address, TransactionKind::Approve { spender, amount }))
    }

    async fn usd_value_of(&self, amount: Amount) -> Result<Amount, PoolError> {
        let (price, unavailable) = self.read(|token| (token.usd_price, token.price_unavailable))?;
        if unavailable {
            return Err(PoolError::Upstream(format!(
                "price feed unavailable for {}",
                self.asset.symbol
            )));
        }
        let scale = U256::from(10u64).pow(U256::from(self.asset.decimals));
        let value = amount.checked_mul(price).ok_or(PoolError::Overflow)?;
        Ok(value / scale)
    }

    fn supports_share_conversion(&self) -> bool {
        self.supports_share_conversion
    }

    async fn calc_share(&self, amount: Amount, _passthrough: bool) -> Result<Amount, PoolError> {
        let rate = self
            .read(|token| token.share_rate)?
            .ok_or(PoolError::Unsupported("share conversion"))?;
        let value = amount.checked_mul(rate).ok_or(PoolError::Overflow)?;
        Ok(value / WEI_PER_UNIT)
    }
}

struct InMemoryPool {
    address: Address,
    state: Arc<Mutex<ChainState>>,
}

impl InMemoryPool {
    fn read<T>(&self, f: impl FnOnce(&PoolState) -> T) -> Result<T, PoolError>
    where
        T: Default,
    {
        let state = lock(&self.state)?;
        Ok(state.snapshot.pools.get(&self.address).map(f).unwrap_or_default())
    }
}

#[async_trait]
impl PoolContract for InMemoryPool {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, account: Address) -> Result<Amount, PoolError> {
        self.read(|pool| pool.stakes.get(&account).copied().unwrap_or_default())
    }

    async fn total_supply(&self) -> Result<Amount, PoolError> {
        self.read(|pool| pool.total_supply)
    }

    async fn stake(&self, amount: Amount) -> Result<PendingTransaction, PoolError> {
        let mut state = lock(&self.state)?;
        let from = state.snapshot.signer.ok_or(PoolError::NoSigner)?;
        Ok(state.submit(from, self.address, TransactionKind::Stake { amount }))
    }

    async fn earned(&self, account: Address) -> Result<Amount, PoolError> {
        self.read(|pool| pool.earned.get(&account).copied().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const USER: Address = address!("00000000000000000000000000000000000000aa");
    const POOL: Address = address!("0000000000000000000000000000000000000001");
    const LP: Address = address!("0000000000000000000000000000000000000002");

    fn asset(address: Address) -> Asset {
        Asset {
            address,
            name: "LP Token".to_string(),
            symbol: "LP".to_string(),
            decimals: 18,
        }
    }

    fn descriptor() -> PoolDescriptor {
        PoolDescriptor {
            address: POOL,
            name: None,
            asset: asset(LP),
            reward_asset: asset(LP),
            variant: None,
            pool_type: None,
        }
    }

    fn chain(balance: u64) -> InMemoryChain {
        let mut snapshot = ChainSnapshot::default();
        snapshot.signer = Some(USER);
        snapshot
            .tokens
            .entry(LP)
            .or_default()
            .balances
            .insert(USER, U256::from(balance));
        InMemoryChain::new(snapshot)
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "signer": "0x00000000000000000000000000000000000000aa",
            "tokens": {
                "0x0000000000000000000000000000000000000002": {
                    "balances": { "0x00000000000000000000000000000000000000aa": "0x64" },
                    "usd_price": "0xde0b6b3a7640000"
                }
            }
        }"#;
        let snapshot = ChainSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.signer, Some(USER));
        let token = &snapshot.tokens[&LP];
        assert_eq!(token.balances[&USER], U256::from(100u64));
        assert_eq!(token.usd_price, WEI_PER_UNIT);
        assert!(token.share_rate.is_none());
    }

    #[tokio::test]
    async fn test_stake_reverts_without_allowance() {
        let chain = chain(100);
        let pool = chain.pool_contract(&descriptor());
        let tx = pool.stake(U256::from(50u64)).await.unwrap();
        let receipt = chain.confirm(&tx).await.unwrap();
        assert!(!receipt.status);
        assert_eq!(pool.balance_of(USER).await.unwrap(), U256::ZERO);
    }

    #[tokio::test]
    async fn test_approve_then_stake_moves_balance() {
        let chain = chain(100);
        let pool = chain.pool_contract(&descriptor());
        let token = chain.token(&asset(LP));

        let approval = token.approve(POOL, U256::from(60u64)).await.unwrap();
        chain.confirm(&approval).await.unwrap();
        let stake = pool.stake(U256::from(50u64)).await.unwrap();
        let receipt = chain.confirm(&stake).await.unwrap();

        assert!(receipt.status);
        assert_eq!(receipt.block_number, 2);
        assert_eq!(pool.balance_of(USER).await.unwrap(), U256::from(50u64));
        assert_eq!(pool.total_supply().await.unwrap(), U256::from(50u64));
        assert_eq!(token.balance_of(USER).await.unwrap(), U256::from(50u64));
        assert_eq!(token.allowance(USER, POOL).await.unwrap(), U256::from(10u64));
    }

    #[tokio::test]
    async fn test_unlimited_allowance_is_not_consumed() {
        let chain = chain(100);
        let pool = chain.pool_contract(&descriptor());
        let token = chain.token(&asset(LP));

        let approval = token.approve(POOL, MAX_UINT).await.unwrap();
        chain.confirm(&approval).await.unwrap();
        let stake = pool.stake(U256::from(100u64)).await.unwrap();
        chain.confirm(&stake).await.unwrap();

        assert_eq!(token.allowance(USER, POOL).await.unwrap(), MAX_UINT);
    }

    #[tokio::test]
    async fn test_submission_requires_signer() {
        let chain = chain(100).with_signer(None);
        let pool = chain.pool_contract(&descriptor());
        assert_eq!(pool.stake(U256::from(1u64)).await, Err(PoolError::NoSigner));
        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_usd_value_scales_by_decimals() {
        let mut snapshot = ChainSnapshot::default();
        snapshot.tokens.entry(LP).or_default().usd_price = U256::from(2u64) * WEI_PER_UNIT;
        let chain = InMemoryChain::new(snapshot);
        let token = chain.token(&asset(LP));

        let value = token.usd_value_of(U256::from(3u64) * WEI_PER_UNIT).await.unwrap();
        assert_eq!(value, U256::from(6u64) * WEI_PER_UNIT);
    }
}
