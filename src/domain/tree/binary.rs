use itertools::Itertools;
use std::sync::Arc;

use super::{hash_elements, LevelReduction, MerkleTreeTrait, ProofPath};
use crate::domain::error::Result;
use crate::domain::hash::HashConfig;
use crate::domain::proof::Direction;

/// Complete binary tree built the way Bitcoin builds block Merkle roots.
///
/// On every odd-length level the last node is duplicated before pairing.
/// This keeps the CVE-2012-2459 ambiguity: `[a, b, c]` and `[a, b, c, c]`
/// commit to the same root. It is kept byte-for-byte for compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteBinaryTree {
    config: Arc<HashConfig>,
    leaves: Vec<String>,
}

impl CompleteBinaryTree {
    pub fn new(config: impl Into<Arc<HashConfig>>, leaves: Vec<String>) -> Self {
        Self {
            config: config.into(),
            leaves,
        }
    }

    /// Build a tree from raw elements, leaf-hashing each with the config's leaf tag.
    pub fn from_elements<S>(config: impl Into<Arc<HashConfig>>, elements: &[S]) -> Self
    where
        S: AsRef<str> + Sync,
    {
        let config = config.into();
        let leaves = hash_elements(&config, elements);
        Self::new(config, leaves)
    }

    pub fn leaves_mut(&mut self) -> &mut Vec<String> {
        &mut self.leaves
    }

    pub fn push(&mut self, leaf: impl Into<String>) {
        self.leaves.push(leaf.into());
    }

    fn pad_level(nodes: &mut Vec<Vec<u8>>) {
        if nodes.len() % 2 == 1 {
            if let Some(last) = nodes.last().cloned() {
                nodes.push(last);
            }
        }
    }
}

impl LevelReduction for CompleteBinaryTree {
    fn leaves(&self) -> &[String] {
        &self.leaves
    }

    fn reduce_level(&self, mut nodes: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
        Self::pad_level(&mut nodes);
        nodes
            .iter()
            .tuples()
            .map(|(left, right)| self.hash_pair(left, right))
            .collect()
    }
}

impl MerkleTreeTrait for CompleteBinaryTree {
    fn config(&self) -> &Arc<HashConfig> {
        &self.config
    }

    fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    fn leaf(&self, index: usize) -> Option<&str> {
        self.leaves.get(index).map(String::as_str)
    }

    fn root_node(&self) -> Result<Vec<u8>> {
        self.reduce_to_root()
    }

    fn derive_siblings(&self, index: usize) -> Result<ProofPath> {
        self.check_index(index)?;

        let mut level = self.decoded_leaves();
        let mut node = index;
        let mut siblings = Vec::new();
        let mut directions = Vec::new();

        while level.len() > 1 {
            Self::pad_level(&mut level);

            let (sibling, direction) = if node % 2 == 0 {
                (node + 1, Direction::Right)
            } else {
                (node - 1, Direction::Left)
            };
            siblings.push(level[sibling].clone());
            directions.push(direction);

            node /= 2;
            level = self.reduce_level(level);
        }

        Ok((siblings, directions))
    }
}
