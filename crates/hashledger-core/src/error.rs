use thiserror::Error;

/// Errors surfaced by the ledger core.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("leaf is not a hex digest: {0}")]
    InvalidLeaf(#[from] hex::FromHexError),

    #[error("merkle tree has no root")]
    EmptyTreeRoot,

    #[error("puzzle width {puzzle} exceeds the {width} hex characters produced by {algorithm}")]
    InvalidPuzzle {
        puzzle: usize,
        width: usize,
        algorithm: String,
    },

    #[error("block {index} is out of sequence")]
    IndexGap { index: u64 },

    #[error("block {index} header hash does not match its contents")]
    HeaderMismatch { index: u64 },

    #[error("block {index} does not link to its predecessor")]
    BrokenLink { index: u64 },

    #[error("block {index} carries an invalid proof of work")]
    InvalidProof { index: u64 },

    #[error("mining operation failed")]
    MiningFailure,

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
