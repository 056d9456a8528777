//! Binary merkle tree over an ordered list of leaf digests.
//!
//! Pairs are hashed left to right over their raw bytes. When a level has an
//! odd number of nodes the last one is carried up unchanged instead of being
//! paired with itself.

use crate::digest::HashAlgorithm;
use crate::error::Result;

type Node = Vec<u8>;

#[derive(Clone, Debug)]
pub struct MerkleTree {
    algorithm: HashAlgorithm,
    leaves: Vec<Node>,
    /// Root level first, leaf level last.
    levels: Option<Vec<Vec<Node>>>,
    ready: bool,
}

impl MerkleTree {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            leaves: Vec::new(),
            levels: None,
            ready: false,
        }
    }

    /// Build an empty tree from an algorithm name such as `"sha256"`.
    pub fn with_algorithm_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Drop all leaves and levels. Call before reusing the tree for another block.
    pub fn reset(&mut self) {
        self.leaves.clear();
        self.levels = None;
        self.ready = false;
    }

    /// Append a leaf.
    ///
    /// With `already_is_digest` the value must be a hex digest and is stored as
    /// its decoded bytes. Otherwise the value is hashed first with the tree's
    /// algorithm.
    pub fn add_leaf(&mut self, value: &str, already_is_digest: bool) -> Result<()> {
        let leaf = if already_is_digest {
            hex::decode(value)?
        } else {
            self.algorithm.digest(value.as_bytes())
        };
        self.leaves.push(leaf);
        self.ready = false;
        Ok(())
    }

    pub fn add_leaves<I, S>(&mut self, values: I, already_is_digest: bool) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            self.add_leaf(value.as_ref(), already_is_digest)?;
        }
        Ok(())
    }

    /// Hex form of the leaf at `index`.
    pub fn leaf(&self, index: usize) -> Option<String> {
        self.leaves.get(index).map(hex::encode)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Collapse the leaves into levels until a single root remains.
    pub fn build(&mut self) {
        self.ready = false;
        if self.leaves.is_empty() {
            self.levels = None;
        } else {
            let mut levels = vec![self.leaves.clone()];
            while levels[0].len() > 1 {
                let next = self.next_level(&levels[0]);
                levels.insert(0, next);
            }
            self.levels = Some(levels);
        }
        self.ready = true;
    }

    fn next_level(&self, level: &[Node]) -> Vec<Node> {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            match pair {
                [left, right] => {
                    let mut joined = Vec::with_capacity(left.len() + right.len());
                    joined.extend_from_slice(left);
                    joined.extend_from_slice(right);
                    next.push(self.algorithm.digest(&joined));
                }
                // odd one out
                _ => next.push(pair[0].clone()),
            }
        }
        next
    }

    /// Hex root, or `None` when the tree is unbuilt or has no leaves.
    pub fn root(&self) -> Option<String> {
        if !self.ready {
            return None;
        }
        self.levels
            .as_ref()
            .and_then(|levels| levels.first())
            .and_then(|level| level.first())
            .map(hex::encode)
    }

    /// Number of levels including leaves and root, zero when unbuilt or empty.
    pub fn depth(&self) -> usize {
        self.levels.as_ref().map_or(0, Vec::len)
    }
}

/// Root of a fresh tree whose leaves are the hashes of `records`, in order.
pub fn merkle_root<I, S>(algorithm: HashAlgorithm, records: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tree = MerkleTree::new(algorithm);
    tree.add_leaves(records, false).ok()?;
    tree.build();
    tree.root()
}
