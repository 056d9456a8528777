use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chain::Ledger;
use crate::constants::{BLOCK_ADDED_MESSAGE, REWARD_AMOUNT, REWARD_SENDER};
use crate::error::{LedgerError, Result};
use crate::merkle::MerkleTree;
use crate::Transaction;

/// Outcome of one successful mining run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineReport {
    pub message: String,
    pub elapsed_time_ns: u64,
    pub nonce: u64,
    pub index: u64,
    pub hash: String,
    pub merkle_root: String,
    pub previous_hash: String,
}

/// Mine the next block from the pending pool.
///
/// Solves the puzzle against the head's nonce, pays `miner_id` a reward,
/// commits every pending transaction to a merkle root built with the ledger's
/// own digest, and seals the block. Any failure is reported as
/// [`LedgerError::MiningFailure`] with the pending pool restored.
///
/// The block's `previous_hash` is `Hash(head.hash)`, not the raw `head.hash`,
/// so mined chains pass [`Ledger::verify`].
pub fn mine(ledger: &mut Ledger, miner_id: &str) -> Result<MineReport> {
    let pending_before = ledger.pending().len();
    try_mine(ledger, miner_id).map_err(|err| abandon(ledger, pending_before, err))
}

/// Drop whatever mining queued past `pending_before` and mask the cause.
fn abandon(ledger: &mut Ledger, pending_before: usize, err: LedgerError) -> LedgerError {
    warn!(error = %err, "mining failed");
    ledger.truncate_pending(pending_before);
    LedgerError::MiningFailure
}

fn try_mine(ledger: &mut Ledger, miner_id: &str) -> Result<MineReport> {
    let started = Instant::now();

    let previous_nonce = ledger.head().nonce;
    let proof = ledger.proof_of_work(previous_nonce);

    ledger.new_transaction(REWARD_SENDER, miner_id, REWARD_AMOUNT);

    let records: Vec<String> = ledger.pending().iter().map(Transaction::record).collect();
    let mut tree = MerkleTree::new(ledger.algorithm());
    tree.add_leaves(&records, false)?;
    tree.build();
    let merkle_root = tree.root().ok_or(LedgerError::EmptyTreeRoot)?;

    let block = ledger.new_block(proof.guess_hash, merkle_root, proof.nonce, None);
    let elapsed_time_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

    info!(
        "Mined block {} with nonce {} and hash {} in {}ns ({} txs)",
        block.index,
        block.nonce,
        block.hash,
        elapsed_time_ns,
        records.len()
    );

    Ok(MineReport {
        message: BLOCK_ADDED_MESSAGE.to_string(),
        elapsed_time_ns,
        nonce: block.nonce,
        index: block.index,
        hash: block.hash,
        merkle_root: block.merkle_root,
        previous_hash: block.previous_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::HashAlgorithm;
    use crate::merkle::merkle_root;
    use crate::pow;

    #[test]
    fn mine_block_example() {
        let mut ledger = Ledger::new(HashAlgorithm::Sha256, 2);
        ledger.new_transaction("Alice", "Bob", 10);
        ledger.new_transaction("Bob", "Charlie", 5);

        let report = mine(&mut ledger, "miner").unwrap();
        let block = ledger.head().clone();

        assert_eq!(report.message, "New block added");
        assert_eq!(report.index, 2);
        assert_eq!(report.hash, block.hash);
        assert_eq!(report.nonce, block.nonce);
        assert_eq!(report.merkle_root, block.merkle_root);
        assert_eq!(report.previous_hash, block.previous_hash);
        assert!(block.guess_hash.starts_with("00"));
        assert_eq!(block.guess_hash, pow::guess(HashAlgorithm::Sha256, 0, block.nonce));
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn failed_mining_restores_pending_pool() {
        let mut ledger = Ledger::new(HashAlgorithm::Sha256, 1);
        ledger.new_transaction("a", "b", 1);
        ledger.new_transaction("c", "d", 2);
        let before = ledger.pending().to_vec();

        ledger.new_transaction(REWARD_SENDER, "miner", REWARD_AMOUNT);
        assert_eq!(ledger.pending().len(), 3);

        let err = abandon(&mut ledger, before.len(), LedgerError::EmptyTreeRoot);
        assert!(matches!(err, LedgerError::MiningFailure));
        assert_eq!(err.to_string(), "mining operation failed");
        assert_eq!(ledger.pending(), before.as_slice());
        assert_eq!(ledger.height(), 1);
    }

    #[test]
    fn reward_is_the_last_leaf() {
        let mut ledger = Ledger::new(HashAlgorithm::Blake2b, 1);
        ledger.new_transaction("a", "b", 3);
        mine(&mut ledger, "7").unwrap();
        let expected = merkle_root(
            HashAlgorithm::Blake2b,
            [
                "{'sender': 'a', 'recipient': 'b', 'amount': 3}",
                "{'sender': '0', 'recipient': '7', 'amount': 1}",
            ],
        );
        assert_eq!(Some(ledger.head().merkle_root.clone()), expected);
    }

    #[test]
    fn empty_pool_still_mines_reward() {
        let mut ledger = Ledger::new(HashAlgorithm::Md5, 1);
        let report = mine(&mut ledger, "1").unwrap();
        let expected = HashAlgorithm::Md5.hash_hex(b"{'sender': '0', 'recipient': '1', 'amount': 1}");
        assert_eq!(report.merkle_root, expected);
    }

    #[test]
    fn successive_blocks_chain_their_nonces() {
        let mut ledger = Ledger::new(HashAlgorithm::Sha3_256, 2);
        for expected_index in 2..=5 {
            let previous_nonce = ledger.head().nonce;
            let report = mine(&mut ledger, "1").unwrap();
            assert_eq!(report.index, expected_index);
            assert_eq!(
                ledger.head().guess_hash,
                pow::guess(HashAlgorithm::Sha3_256, previous_nonce, report.nonce)
            );
        }
        ledger.verify().unwrap();
    }
}
