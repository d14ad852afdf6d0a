//! Chain access - contract, token and connection handles

pub mod memory;
pub mod traits;

pub use memory::{ChainSnapshot, InMemoryChain, PoolState, TokenState};
pub use traits::{Connection, PoolContract, TokenAdapter};
