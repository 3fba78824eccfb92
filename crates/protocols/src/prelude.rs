//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use pool_watch_protocols::prelude::*;
//! ```

pub use crate::error::ChainError;
pub use crate::ethereum::{ContractAddresses, EthereumReader};
pub use crate::reader::{BlockSource, DaoStateReader, OraclePrice, PoolStateReader, PriceFeed};
