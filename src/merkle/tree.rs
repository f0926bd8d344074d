//! Level-by-level Merkle reduction.
//!
//! Each level pairs `(0,1), (2,3), ...` and replaces every pair with
//! `H(hex(left) || hex(right))`. On an odd-length level the last digest is
//! carried up unchanged: it is neither duplicated nor re-hashed. A level of
//! one digest is the root.
//!
//! ```text
//! d1   d2   d3
//!  \   /    |
//!   d12     d3
//!     \    /
//!     d123
//! ```

use crate::model::Digest;
use crate::{Error, Result};

/// Combine two sibling digests into their parent.
#[inline]
pub fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    Digest::digest_hex_concat(&[*left, *right])
}

/// Reduce one level to the next, preserving pair order.
pub fn next_level(level: &[Digest]) -> Vec<Digest> {
    level
        .chunks(2)
        .map(|chunk| match chunk {
            [left, right] => hash_pair(left, right),
            [odd] => *odd,
            _ => unreachable!("chunks(2) yields one or two items"),
        })
        .collect()
}

/// Fold a level of digests down to its root.
///
/// Returns [`Error::EmptyInput`] for an empty level. A single digest is
/// returned as-is with no hashing.
pub fn build_root(leaves: &[Digest]) -> Result<Digest> {
    let mut level = match leaves {
        [] => return Err(Error::EmptyInput),
        [root] => return Ok(*root),
        _ => next_level(leaves),
    };

    while level.len() > 1 {
        level = next_level(&level);
    }

    Ok(level[0])
}

/// A fully reduced Merkle tree that keeps every level.
///
/// Level 0 holds the leaves in input order; the last level holds only the
/// root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree from leaf digests.
    pub fn build(leaves: impl Into<Vec<Digest>>) -> Result<Self> {
        let leaves = leaves.into();
        if leaves.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut levels = vec![leaves];
        while let Some(top) = levels.last().filter(|l| l.len() > 1) {
            let next = next_level(top);
            levels.push(next);
        }

        Ok(MerkleTree { levels })
    }

    /// Returns the root digest.
    pub fn root(&self) -> Digest {
        // build() rejects empty input, so the top level has exactly one digest
        self.levels[self.levels.len() - 1][0]
    }

    /// Returns the leaf digests in input order.
    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    /// Returns the number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.levels[0].len()
    }

    /// Returns the number of levels, leaves and root included.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Returns all levels, from leaves to root.
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }
}
