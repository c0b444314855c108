use log::{debug, info, trace};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

use super::digest::{bin_to_hex, hex_to_bin};
use super::error::{MerkleError, Result};
use super::hash::HashConfig;
use super::proof::{Direction, Proof};

pub mod binary;
pub mod nested;
pub mod promotion;

/// Sibling digests ordered from the leaf upward, with the matching
/// directions.
pub type ProofPath = (Vec<Vec<u8>>, Vec<Direction>);

/// Root computation and proof generation shared by every tree variant.
///
/// Nothing is cached: every call recomputes from the current leaves, so
/// results always reflect mutations made between calls.
pub trait MerkleTreeTrait {
    fn config(&self) -> &Arc<HashConfig>;

    fn leaf_count(&self) -> usize;

    /// Leaf digest at `index` in depth-first, left-to-right order.
    fn leaf(&self, index: usize) -> Option<&str>;

    /// Root digest in binary form.
    fn root_node(&self) -> Result<Vec<u8>>;

    /// Siblings and directions needed to climb from leaf `index` to the root.
    fn derive_siblings(&self, index: usize) -> Result<ProofPath>;

    fn combine(&self, left: &[u8], right: &[u8]) -> Vec<u8> {
        self.config().combine(left, right)
    }

    fn branch_hash(&self, data: &[u8]) -> Vec<u8> {
        self.config().branch_hash(data)
    }

    /// Parent digest of two children.
    fn hash_pair(&self, left: &[u8], right: &[u8]) -> Vec<u8> {
        self.branch_hash(&self.combine(left, right))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(MerkleError::InvalidIndex { index, leaf_count });
        }
        Ok(())
    }

    /// Hex-encoded Merkle root, or [`MerkleError::EmptyTree`].
    fn compute_root(&self) -> Result<String> {
        let start = Instant::now();
        let root = bin_to_hex(self.root_node()?);
        info!(
            "Computed root over {} leaves in {:?}",
            self.leaf_count(),
            start.elapsed()
        );
        Ok(root)
    }

    /// Inclusion proof for the leaf at `index`.
    fn generate_proof(&self, index: usize) -> Result<Proof> {
        let start = Instant::now();
        self.check_index(index)?;
        let leaf = self
            .leaf(index)
            .ok_or(MerkleError::InvalidIndex {
                index,
                leaf_count: self.leaf_count(),
            })?
            .to_owned();

        let (siblings, mut directions) = self.derive_siblings(index)?;
        if self.config().sort_siblings() {
            directions.clear();
        }
        let siblings = siblings.iter().map(bin_to_hex).collect::<Vec<_>>();

        let proof = Proof::new(
            self.config().clone(),
            self.compute_root()?,
            leaf,
            siblings,
            directions,
        )?;
        debug!(
            "Generated proof for leaf {} with {} siblings in {:?}",
            index,
            proof.siblings().len(),
            start.elapsed()
        );
        Ok(proof)
    }

    /// Index of the first leaf whose decoded digest equals `leaf`.
    fn leaf_index(&self, leaf: &str) -> Option<usize> {
        let target = hex_to_bin(leaf);
        (0..self.leaf_count()).find(|&index| {
            self.leaf(index)
                .is_some_and(|candidate| hex_to_bin(candidate) == target)
        })
    }
}

/// Trees over a flat leaf sequence whose root is reached by reducing one
/// level at a time.
pub trait LevelReduction: MerkleTreeTrait {
    fn leaves(&self) -> &[String];

    /// Build the next level up from `nodes`.
    fn reduce_level(&self, nodes: Vec<Vec<u8>>) -> Vec<Vec<u8>>;

    fn decoded_leaves(&self) -> Vec<Vec<u8>> {
        self.leaves()
            .iter()
            .map(|leaf| hex_to_bin(leaf).into_owned())
            .collect()
    }

    fn reduce_to_root(&self) -> Result<Vec<u8>> {
        let mut nodes = self.decoded_leaves();
        if nodes.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        let mut height = 0;
        while nodes.len() > 1 {
            nodes = self.reduce_level(nodes);
            height += 1;
            trace!("Level {} reduced to {} nodes", height, nodes.len());
        }
        nodes.pop().ok_or(MerkleError::EmptyTree)
    }
}

/// Leaf-hash raw elements with the config's leaf tag, hex-encoding each digest.
pub(crate) fn hash_elements<S>(config: &HashConfig, elements: &[S]) -> Vec<String>
where
    S: AsRef<str> + Sync,
{
    let start = Instant::now();
    let hashed: Vec<String> = elements
        .par_iter()
        .map(|element| bin_to_hex(config.leaf_hash(element.as_ref())))
        .collect();
    debug!("Hashing {} elements took {:?}", hashed.len(), start.elapsed());
    hashed
}
