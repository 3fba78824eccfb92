use serde::{Deserialize, Serialize};

/// Block metadata that drives one detection cycle.
///
/// The block timestamp is the detection clock, so replaying a block range
/// produces the same alerts as following it live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block number.
    pub number: u64,
    /// Block timestamp in unix seconds.
    pub timestamp: u64,
}

impl BlockHeader {
    /// Creates a new block header.
    #[must_use]
    pub fn new(number: u64, timestamp: u64) -> Self {
        Self { number, timestamp }
    }

    /// Returns the block number `blocks` before this one, saturating at genesis.
    #[must_use]
    pub fn number_before(&self, blocks: u64) -> u64 {
        self.number.saturating_sub(blocks)
    }
}
