//! Ethereum JSON-RPC implementation of the collaborator traits.

/// Human readable contract ABIs.
pub mod abi;
/// Contract address set.
mod addresses;
/// JSON-RPC reader.
mod reader;

pub use addresses::ContractAddresses;
pub use reader::EthereumReader;
