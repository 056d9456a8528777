//! Single-node append-only ledger with a pluggable digest.
//!
//! Transactions collect in a pending pool until a block is mined. Mining
//! solves a proof-of-work puzzle chained to the previous block's nonce,
//! commits the pending transactions with a merkle root, and seals a block
//! whose header hash links back to its predecessor.

pub mod chain;
pub mod config;
pub mod constants;
pub mod digest;
pub mod error;
pub mod merkle;
pub mod mine;
pub mod pow;
pub mod service;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use chain::Ledger;
pub use config::LedgerConfig;
pub use digest::HashAlgorithm;
pub use error::{LedgerError, Result};
pub use merkle::{merkle_root, MerkleTree};
pub use mine::{mine, MineReport};
pub use pow::Proof;
pub use service::{ChainSnapshot, LedgerService, Submission};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// The string committed to the merkle tree for this transaction.
    pub fn record(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'sender': {}, 'recipient': {}, 'amount': {}}}",
            quoted(&self.sender),
            quoted(&self.recipient),
            self.amount
        )
    }
}

/// Quote a string field so distinct values never render alike.
///
/// Single quotes unless the value holds `'` and no `"`. Backslashes, the
/// chosen quote and control characters are escaped.
fn quoted(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// Header hash over `previous_hash`, `merkle_root` and `nonce`.
    pub hash: String,
    pub guess_hash: String,
    pub nonce: u64,
    pub merkle_root: String,
    pub previous_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_record_form() {
        let tx = Transaction::new("alice", "bob", 200);
        assert_eq!(
            tx.record(),
            "{'sender': 'alice', 'recipient': 'bob', 'amount': 200}"
        );
    }

    #[test]
    fn quote_in_sender_switches_to_double_quotes() {
        let tx = Transaction::new("a', 'recipient': 'b", "c", 1);
        assert_eq!(
            tx.record(),
            r#"{'sender': "a', 'recipient': 'b", 'recipient': 'c', 'amount': 1}"#
        );
    }

    #[test]
    fn record_escapes_backslashes_and_mixed_quotes() {
        let tx = Transaction::new(r#"it's "x""#, r"c:\tmp", 2);
        assert_eq!(
            tx.record(),
            r#"{'sender': 'it\'s "x"', 'recipient': 'c:\\tmp', 'amount': 2}"#
        );
        let tx = Transaction::new("line\nbreak", "\u{1}\u{85}", 3);
        assert_eq!(
            tx.record(),
            r"{'sender': 'line\nbreak', 'recipient': '\x01\x85', 'amount': 3}"
        );
    }

    #[test]
    fn injected_fields_give_distinct_records_and_roots() {
        let first = Transaction::new("a', 'recipient': 'b", "c", 1);
        let second = Transaction::new("a", "b', 'recipient': 'c", 1);
        assert_ne!(first.record(), second.record());

        let mut ledger = Ledger::new(HashAlgorithm::Sha256, 1);
        ledger.new_transaction(first.sender.clone(), first.recipient.clone(), first.amount);
        let first_root = mine(&mut ledger, "1").unwrap().merkle_root;
        ledger.new_transaction(second.sender.clone(), second.recipient.clone(), second.amount);
        let second_root = mine(&mut ledger, "1").unwrap().merkle_root;
        assert_ne!(first_root, second_root);
    }

    #[test]
    fn transaction_serialization_example() {
        let tx = Transaction::new("Alice", "Bob", 10);
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(json, r#"{"sender":"Alice","recipient":"Bob","amount":10}"#);
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, deserialized);
    }

    #[test]
    fn transaction_rejects_negative_amount() {
        let json = r#"{"sender":"Alice","recipient":"Bob","amount":-1}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn block_serialization_field_order() {
        let block = Block {
            index: 2,
            hash: "ab".into(),
            guess_hash: "00cd".into(),
            nonce: 17,
            merkle_root: "ef".into(),
            previous_hash: "12".into(),
        };
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(
            json,
            r#"{"index":2,"hash":"ab","guess_hash":"00cd","nonce":17,"merkle_root":"ef","previous_hash":"12"}"#
        );
        let deserialized: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block, deserialized);
    }
}
