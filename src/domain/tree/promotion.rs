use std::sync::Arc;

use super::{hash_elements, LevelReduction, MerkleTreeTrait, ProofPath};
use crate::domain::error::Result;
use crate::domain::hash::HashConfig;
use crate::domain::proof::Direction;

/// Unbalanced tree that promotes an unpaired trailing node to the next level
/// instead of duplicating it.
///
/// Promoted leaves end up shallower than their paired neighbours, so proof
/// length varies per leaf. Taproot script trees are often built this way so
/// that frequently used scripts get short control blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionTree {
    config: Arc<HashConfig>,
    leaves: Vec<String>,
}

impl PromotionTree {
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
}

impl LevelReduction for PromotionTree {
    fn leaves(&self) -> &[String] {
        &self.leaves
    }

    fn reduce_level(&self, nodes: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
        let mut next_level = Vec::with_capacity(nodes.len().div_ceil(2));
        let mut nodes = nodes.into_iter();

        while let Some(left) = nodes.next() {
            match nodes.next() {
                Some(right) => next_level.push(self.hash_pair(&left, &right)),
                // Unpaired trailing node moves up untouched
                None => next_level.push(left),
            }
        }
        next_level
    }
}

impl MerkleTreeTrait for PromotionTree {
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
            let level_len = level.len();

            if node % 2 == 1 {
                siblings.push(level[node - 1].clone());
                directions.push(Direction::Left);
                node /= 2;
            } else if node + 1 < level_len {
                siblings.push(level[node + 1].clone());
                directions.push(Direction::Right);
                node /= 2;
            } else {
                // Promoted: no sibling here, and it lands at the end of the next level
                node = level_len / 2;
            }

            level = self.reduce_level(level);
        }

        Ok((siblings, directions))
    }
}
