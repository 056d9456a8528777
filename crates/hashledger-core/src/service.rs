//! Thread-safe front over a [`Ledger`].
//!
//! Every operation holds the ledger lock for its whole duration, so a
//! transaction submitted while a block is being mined waits and lands in the
//! following block instead of being cleared unseen.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::chain::Ledger;
use crate::config::LedgerConfig;
use crate::error::Result;
use crate::mine::{mine, MineReport};
use crate::{Block, Transaction};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub message: String,
    pub tx: Transaction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

pub struct LedgerService {
    ledger: Mutex<Ledger>,
    miner_id: String,
}

impl LedgerService {
    pub fn new(config: &LedgerConfig) -> Result<Self> {
        Ok(Self {
            ledger: Mutex::new(Ledger::from_config(config)?),
            miner_id: config.miner_id.clone(),
        })
    }

    pub fn miner_id(&self) -> &str {
        &self.miner_id
    }

    pub fn submit_transaction(&self, sender: &str, recipient: &str, amount: u64) -> Submission {
        let index = self.ledger.lock().new_transaction(sender, recipient, amount);
        Submission {
            message: format!("Transaction will be added to block {index}"),
            tx: Transaction::new(sender, recipient, amount),
        }
    }

    /// Mine one block. Blocks the calling thread for the whole proof-of-work search.
    pub fn mine(&self) -> Result<MineReport> {
        let mut ledger = self.ledger.lock();
        mine(&mut ledger, &self.miner_id)
    }

    pub fn chain(&self) -> ChainSnapshot {
        let ledger = self.ledger.lock();
        let chain = ledger.blocks().to_vec();
        ChainSnapshot {
            length: chain.len(),
            chain,
        }
    }

    pub fn pending(&self) -> Vec<Transaction> {
        self.ledger.lock().pending().to_vec()
    }

    pub fn verify(&self) -> Result<()> {
        self.ledger.lock().verify()
    }
}
