//! Ledger configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MINER_ID, DEFAULT_PUZZLE};
use crate::digest::HashAlgorithm;
use crate::error::{LedgerError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Leading `'0'` characters a guess hash needs.
    #[serde(default = "default_puzzle")]
    pub puzzle: usize,
    /// Recipient of the per-block reward.
    #[serde(default = "default_miner_id")]
    pub miner_id: String,
}

fn default_puzzle() -> usize {
    DEFAULT_PUZZLE
}

fn default_miner_id() -> String {
    DEFAULT_MINER_ID.to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::default(),
            puzzle: default_puzzle(),
            miner_id: default_miner_id(),
        }
    }
}

impl LedgerConfig {
    pub fn new(hash: HashAlgorithm, puzzle: usize) -> Self {
        Self {
            hash,
            puzzle,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document. An unknown `hash` name surfaces as
    /// [`LedgerError::UnsupportedAlgorithm`], like the CLI flag does.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let table: toml::Table = s.parse()?;
        if let Some(name) = table.get("hash").and_then(toml::Value::as_str) {
            name.parse::<HashAlgorithm>()?;
        }
        let config: Self = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// A puzzle wider than the digest could never be solved.
    pub fn validate(&self) -> Result<()> {
        let width = self.hash.hex_len();
        if self.puzzle > width {
            return Err(LedgerError::InvalidPuzzle {
                puzzle: self.puzzle,
                width,
                algorithm: self.hash.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.hash, HashAlgorithm::Sha256);
        assert_eq!(config.puzzle, 4);
        assert_eq!(config.miner_id, "1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config = LedgerConfig::from_toml_str(r#"hash = "blake3""#).unwrap();
        assert_eq!(config.hash, HashAlgorithm::Blake3);
        assert_eq!(config.puzzle, DEFAULT_PUZZLE);
        assert_eq!(config.miner_id, DEFAULT_MINER_ID);
    }

    #[test]
    fn full_toml() {
        let config = LedgerConfig::from_toml_str(
            r#"
            hash = "sha3"
            puzzle = 2
            miner_id = "miner-7"
            "#,
        )
        .unwrap();
        assert_eq!(config.hash, HashAlgorithm::Sha3_256);
        assert_eq!(config.puzzle, 2);
        assert_eq!(config.miner_id, "miner-7");
    }

    #[test]
    fn unknown_algorithm_in_toml() {
        let err = LedgerConfig::from_toml_str(r#"hash = "whirlpool""#).unwrap_err();
        assert!(matches!(err, LedgerError::UnsupportedAlgorithm(ref name) if name == "whirlpool"));
        assert_eq!(err.to_string(), "unsupported hash algorithm: whirlpool");
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = LedgerConfig::from_toml_str("puzzle = ").unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
        let err = LedgerConfig::from_toml_str("hash = 7").unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn puzzle_wider_than_digest_is_rejected() {
        let err = LedgerConfig::from_toml_str("hash = \"md5\"\npuzzle = 33").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidPuzzle { puzzle: 33, width: 32, .. }
        ));
        assert!(LedgerConfig::new(HashAlgorithm::Md5, 32).validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hash = \"blake2s\"\npuzzle = 3").unwrap();
        let config = LedgerConfig::load(file.path()).unwrap();
        assert_eq!(config.hash, HashAlgorithm::Blake2s);
        assert_eq!(config.puzzle, 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LedgerConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, LedgerError::Io(_)));
    }
}
