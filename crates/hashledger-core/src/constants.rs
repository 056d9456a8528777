pub const DEFAULT_PUZZLE: usize = 4;
pub const DEFAULT_MINER_ID: &str = "1";

pub const GENESIS_GUESS_HASH: &str = "1";
pub const GENESIS_PREVIOUS_HASH: &str = "1";
pub const GENESIS_MERKLE_ROOT: &str = "0";
pub const GENESIS_NONCE: u64 = 0;

pub const REWARD_SENDER: &str = "0";
pub const REWARD_AMOUNT: u64 = 1;

pub const BLOCK_ADDED_MESSAGE: &str = "New block added";
pub const MINING_FAILED_MESSAGE: &str = "Mining operation failed";
