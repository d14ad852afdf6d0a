//! Error handling for the application

use alloy_primitives::Address;
use thiserror::Error;

/// Pool-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A mutating call was made on a connection without a signer.
    #[error("no signer bound to the connection")]
    NoSigner,

    /// A contract or token call failed; the message is carried through unchanged.
    #[error("upstream call failed: {0}")]
    Upstream(String),

    #[error("operation not supported by this adapter: {0}")]
    Unsupported(&'static str),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("fixed-point formatting failed: {0}")]
    Format(String),
}

/// Registry-related errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read registry file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("pool {0} is declared more than once")]
    DuplicatePool(Address),

    #[error("unknown cohort: {0}")]
    UnknownCohort(String),
}
