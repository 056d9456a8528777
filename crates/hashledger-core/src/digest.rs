//! Uniform access to the supported hash families.
//!
//! A [`HashAlgorithm`] is picked once, when a ledger or merkle tree is built,
//! and stays fixed for that instance's lifetime. Hashing itself never fails:
//! an unknown name is rejected when it is parsed.

use std::fmt;
use std::str::FromStr;

use blake2::{Blake2b512, Blake2s256};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use sha3::Sha3_256;

use crate::error::LedgerError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    #[default]
    Sha256,
    Sha3_256,
    Sha512,
    Blake2s,
    Blake2b,
    Blake3,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 8] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Blake2s,
        HashAlgorithm::Blake2b,
        HashAlgorithm::Blake3,
    ];

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha3_256 => "sha3_256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake2s => "blake2s",
            HashAlgorithm::Blake2b => "blake2b",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Digest width in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256
            | HashAlgorithm::Sha3_256
            | HashAlgorithm::Blake2s
            | HashAlgorithm::Blake3 => 32,
            HashAlgorithm::Sha512 | HashAlgorithm::Blake2b => 64,
        }
    }

    /// Digest width in lowercase hex characters.
    pub fn hex_len(&self) -> usize {
        self.output_len() * 2
    }

    /// Raw digest bytes of `data`.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Md5 => run::<Md5>(data),
            HashAlgorithm::Sha1 => run::<Sha1>(data),
            HashAlgorithm::Sha256 => run::<Sha256>(data),
            HashAlgorithm::Sha3_256 => run::<Sha3_256>(data),
            HashAlgorithm::Sha512 => run::<Sha512>(data),
            HashAlgorithm::Blake2s => run::<Blake2s256>(data),
            HashAlgorithm::Blake2b => run::<Blake2b512>(data),
            HashAlgorithm::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }

    /// Lowercase hex digest of `data`.
    pub fn hash_hex(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }
}

fn run<D: Digest>(data: &[u8]) -> Vec<u8> {
    D::digest(data).to_vec()
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let algorithm = match s.trim().to_ascii_lowercase().as_str() {
            "md5" => HashAlgorithm::Md5,
            "sha1" | "sha-1" => HashAlgorithm::Sha1,
            "sha256" | "sha-256" => HashAlgorithm::Sha256,
            "sha3_256" | "sha3-256" | "sha3" => HashAlgorithm::Sha3_256,
            "sha512" | "sha-512" => HashAlgorithm::Sha512,
            "blake2s" => HashAlgorithm::Blake2s,
            "blake2b" => HashAlgorithm::Blake2b,
            "blake3" => HashAlgorithm::Blake3,
            _ => return Err(LedgerError::UnsupportedAlgorithm(s.to_string())),
        };
        Ok(algorithm)
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashAlgorithm> for String {
    fn from(algorithm: HashAlgorithm) -> Self {
        algorithm.name().to_string()
    }
}
