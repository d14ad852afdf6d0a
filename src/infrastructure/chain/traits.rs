use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::shared::errors::PoolError;
use crate::shared::types::{Amount, Asset, PendingTransaction, PoolDescriptor, TransactionReceipt};

/// Balance and pricing interface for a single asset
#[async_trait]
pub trait TokenAdapter: Send + Sync {
    /// Display name of the asset
    fn name(&self) -> String;

    fn symbol(&self) -> String;

    /// Wallet balance of `account`
    async fn balance_of(&self, account: Address) -> Result<Amount, PoolError>;

    /// Amount `spender` may transfer out of `owner`'s balance
    async fn allowance(&self, owner: Address, spender: Address) -> Result<Amount, PoolError>;

    /// Submit an approval; resolves once the transaction is on the wire
    async fn approve(&self, spender: Address, amount: Amount) -> Result<PendingTransaction, PoolError>;

    /// USD value of `amount` of this asset
    async fn usd_value_of(&self, amount: Amount) -> Result<Amount, PoolError>;

    /// Whether the asset is a share token convertible to underlying units
    fn supports_share_conversion(&self) -> bool {
        false
    }

    /// Convert `amount` shares to underlying units
    async fn calc_share(&self, _amount: Amount, _passthrough: bool) -> Result<Amount, PoolError> {
        Err(PoolError::Unsupported("share conversion"))
    }
}

/// Live handle to a deployed rewards pool contract
#[async_trait]
pub trait PoolContract: Send + Sync {
    /// Address the handle is bound to
    fn address(&self) -> Address;

    /// Staked balance of `account`
    async fn balance_of(&self, account: Address) -> Result<Amount, PoolError>;

    async fn total_supply(&self) -> Result<Amount, PoolError>;

    /// Submit a stake of `amount` from the signer
    async fn stake(&self, amount: Amount) -> Result<PendingTransaction, PoolError>;

    /// Claimable rewards of `account`; only harvest contracts expose this
    async fn earned(&self, account: Address) -> Result<Amount, PoolError>;
}

/// Binding layer between pool logic and a network
///
/// Hands out contract and token handles and confirms submitted transactions.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Address of the bound signer, if any
    fn signer(&self) -> Option<Address>;

    /// Bind a contract handle to the descriptor's address
    fn pool_contract(&self, descriptor: &PoolDescriptor) -> Arc<dyn PoolContract>;

    /// Bind a token adapter for `asset`
    fn token(&self, asset: &Asset) -> Arc<dyn TokenAdapter>;

    /// Wait for a submitted transaction to be included
    async fn confirm(&self, tx: &PendingTransaction) -> Result<TransactionReceipt, PoolError>;
}
