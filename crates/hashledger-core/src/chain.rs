use tracing::debug;

use crate::config::LedgerConfig;
use crate::constants::{
    GENESIS_GUESS_HASH, GENESIS_MERKLE_ROOT, GENESIS_NONCE, GENESIS_PREVIOUS_HASH,
};
use crate::digest::HashAlgorithm;
use crate::error::{LedgerError, Result};
use crate::pow::{self, Proof};
use crate::{Block, Transaction};

/// Ordered blocks plus the pool of transactions waiting for the next one.
///
/// The chain always holds at least the genesis block. Blocks are only ever
/// appended, through [`Ledger::new_block`].
#[derive(Clone, Debug)]
pub struct Ledger {
    algorithm: HashAlgorithm,
    puzzle: usize,
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Ledger {
    pub fn new(algorithm: HashAlgorithm, puzzle: usize) -> Self {
        let mut ledger = Self {
            algorithm,
            puzzle,
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger.new_block(
            GENESIS_GUESS_HASH,
            GENESIS_MERKLE_ROOT,
            GENESIS_NONCE,
            Some(GENESIS_PREVIOUS_HASH.to_string()),
        );
        ledger
    }

    pub fn with_algorithm_name(name: &str, puzzle: usize) -> Result<Self> {
        Self::from_config(&LedgerConfig::new(name.parse()?, puzzle))
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.hash, config.puzzle))
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn puzzle(&self) -> usize {
        self.puzzle
    }

    /// The last block. Never absent: genesis exists from construction.
    pub fn head(&self) -> &Block {
        &self.chain[self.chain.len() - 1]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn height(&self) -> u64 {
        self.chain.len() as u64
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Queue a transaction. Returns the index of the block it should land in.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        let tx = Transaction::new(sender, recipient, amount);
        debug!(%tx, pending = self.pending.len() + 1, "transaction queued");
        self.pending.push(tx);
        self.head().index + 1
    }

    pub fn proof_of_work(&self, previous_nonce: u64) -> Proof {
        pow::proof_of_work(self.algorithm, previous_nonce, self.puzzle)
    }

    pub fn header_hash(&self, previous_hash: &str, merkle_root: &str, nonce: u64) -> String {
        self.algorithm
            .hash_hex(format!("{previous_hash}{merkle_root}{nonce}").as_bytes())
    }

    /// Hash a predecessor's header hash into the `previous_hash` of its successor.
    pub fn link_hash(&self, hash: &str) -> String {
        self.algorithm.hash_hex(hash.as_bytes())
    }

    /// Seal and append a block, clearing the pending pool.
    ///
    /// Without an explicit `previous_hash` the block links to the hash of the
    /// current head's header hash.
    pub fn new_block(
        &mut self,
        guess_hash: impl Into<String>,
        merkle_root: impl Into<String>,
        nonce: u64,
        previous_hash: Option<String>,
    ) -> Block {
        let merkle_root = merkle_root.into();
        let previous_hash = previous_hash.unwrap_or_else(|| self.link_hash(&self.head().hash));
        let block = Block {
            index: self.chain.len() as u64 + 1,
            hash: self.header_hash(&previous_hash, &merkle_root, nonce),
            guess_hash: guess_hash.into(),
            nonce,
            merkle_root,
            previous_hash,
        };
        debug!(index = block.index, hash = %block.hash, "block sealed");
        self.pending.clear();
        self.chain.push(block.clone());
        block
    }

    pub(crate) fn truncate_pending(&mut self, len: usize) {
        self.pending.truncate(len);
    }

    /// Check index continuity, header hashes, linkage and proofs.
    ///
    /// Genesis is checked for its index and header hash only. It is never
    /// mined and its `previous_hash` is a sentinel.
    pub fn verify(&self) -> Result<()> {
        let mut previous: Option<&Block> = None;
        for block in &self.chain {
            let expected_index = previous.map_or(1, |p| p.index + 1);
            if block.index != expected_index {
                return Err(LedgerError::IndexGap { index: block.index });
            }
            if block.hash != self.header_hash(&block.previous_hash, &block.merkle_root, block.nonce)
            {
                return Err(LedgerError::HeaderMismatch { index: block.index });
            }
            if let Some(prev) = previous {
                if block.previous_hash != self.link_hash(&prev.hash) {
                    return Err(LedgerError::BrokenLink { index: block.index });
                }
                let guess_hash = pow::guess(self.algorithm, prev.nonce, block.nonce);
                if block.guess_hash != guess_hash || !pow::meets_puzzle(&guess_hash, self.puzzle) {
                    return Err(LedgerError::InvalidProof { index: block.index });
                }
            }
            previous = Some(block);
        }
        Ok(())
    }
}
