use crate::digest::HashAlgorithm;

/// Winning nonce and the guess hash it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub nonce: u64,
    pub guess_hash: String,
}

/// Hash of the decimal strings of `previous_nonce` and `nonce`, concatenated
/// with no separator.
pub fn guess(algorithm: HashAlgorithm, previous_nonce: u64, nonce: u64) -> String {
    algorithm.hash_hex(format!("{previous_nonce}{nonce}").as_bytes())
}

/// True when `hash` starts with `puzzle` ASCII `'0'` characters.
pub fn meets_puzzle(hash: &str, puzzle: usize) -> bool {
    hash.len() >= puzzle && hash.bytes().take(puzzle).all(|b| b == b'0')
}

pub fn leading_zero_chars(hash: &str) -> usize {
    hash.bytes().take_while(|b| *b == b'0').count()
}

/// Scan nonces upward from zero until the guess hash meets the puzzle.
///
/// There is no upper bound on the search. Callers must keep `puzzle` within
/// the algorithm's hex width or this never returns.
pub fn proof_of_work(algorithm: HashAlgorithm, previous_nonce: u64, puzzle: usize) -> Proof {
    let mut nonce = 0u64;
    loop {
        let guess_hash = guess(algorithm, previous_nonce, nonce);
        if meets_puzzle(&guess_hash, puzzle) {
            return Proof { nonce, guess_hash };
        }
        nonce += 1;
    }
}
