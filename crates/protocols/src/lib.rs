//! Chain collaborators of the pool monitor.
//!
//! This crate defines what the detectors need from the chain and provides
//! an Ethereum JSON-RPC implementation of it:
//! - Pool reserves, simulated trades and wrapped token conversion
//! - Oracle price feed
//! - DAO operations state
//! - Block headers

/// Mainnet contract addresses.
pub mod constants;
/// Chain read errors.
pub mod error;
/// Ethereum JSON-RPC implementation.
pub mod ethereum;
/// Prelude module for convenient imports.
pub mod prelude;
/// Collaborator traits.
pub mod reader;

pub use error::ChainError;
pub use reader::{BlockSource, DaoStateReader, OraclePrice, PoolStateReader, PriceFeed};
