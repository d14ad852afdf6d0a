//! Common types used across the application

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// On-chain token quantity in base units.
pub type Amount = U256;

/// Transaction hash.
pub type TxHash = B256;

/// Static asset metadata, as declared in the pool registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    18
}

/// Immutable description of one deployed rewards pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolDescriptor {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Asset accepted for staking.
    pub asset: Asset,
    /// Asset paid out as rewards.
    pub reward_asset: Asset,
    /// Contract ABI variant label handed to the binding layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Reward accrual tag, e.g. `"auto-compounding"` or `"harvest"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_type: Option<String>,
}

/// What a submitted transaction does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    Approve { spender: Address, amount: Amount },
    Stake { amount: Amount },
}

/// A transaction that has been submitted to the network but not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: TxHash,
    pub from: Address,
    /// Contract the transaction was sent to.
    pub to: Address,
    pub kind: TransactionKind,
}

/// Outcome of a confirmed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub status: bool,
}
