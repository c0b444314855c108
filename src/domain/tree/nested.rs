use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{MerkleTreeTrait, ProofPath};
use crate::domain::digest::{bin_to_hex, hex_to_bin};
use crate::domain::error::{MerkleError, Result};
use crate::domain::hash::HashConfig;
use crate::domain::proof::Direction;

/// Deepest branch nesting accepted, the BIP-341 control block limit.
pub const MAX_NESTING_DEPTH: usize = 128;

/// One node of a caller-shaped tree.
///
/// Serialized untagged: a leaf is a JSON string, a branch a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Leaf(String),
    Branch(Vec<Node>),
}

impl Node {
    pub fn leaf(value: impl Into<String>) -> Self {
        Node::Leaf(value.into())
    }

    pub fn branch(children: Vec<Node>) -> Self {
        Node::Branch(children)
    }

    /// Check that every branch has 1 or 2 children and that nesting stays
    /// within [`MAX_NESTING_DEPTH`].
    pub fn validate(&self) -> Result<()> {
        self.validate_at(0)
    }

    fn validate_at(&self, depth: usize) -> Result<()> {
        match self {
            Node::Leaf(_) => Ok(()),
            Node::Branch(_) if depth >= MAX_NESTING_DEPTH => {
                Err(MerkleError::DepthLimitExceeded(MAX_NESTING_DEPTH))
            }
            Node::Branch(children) => {
                if !(1..=2).contains(&children.len()) {
                    return Err(MerkleError::InvalidChildCount(children.len()));
                }
                children
                    .iter()
                    .try_for_each(|child| child.validate_at(depth + 1))
            }
        }
    }

    /// Same shape with every leaf replaced by `f(leaf)`.
    pub fn map_leaves<F>(&self, f: &F) -> Node
    where
        F: Fn(&str) -> String,
    {
        match self {
            Node::Leaf(value) => Node::Leaf(f(value)),
            Node::Branch(children) => {
                Node::Branch(children.iter().map(|child| child.map_leaves(f)).collect())
            }
        }
    }

    /// Leaves in depth-first, left-to-right order.
    pub fn collect_leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.push_leaves(&mut leaves);
        leaves
    }

    fn push_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        match self {
            Node::Leaf(value) => leaves.push(value),
            Node::Branch(children) => children
                .iter()
                .for_each(|child| child.push_leaves(leaves)),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Branch(children) => children.iter().map(Node::leaf_count).sum(),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::leaf(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Leaf(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(children: Vec<Node>) -> Self {
        Node::Branch(children)
    }
}

/// Tree whose shape is given by the caller as a nested [`Node`].
///
/// The structure is validated once and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedTree {
    config: Arc<HashConfig>,
    structure: Node,
}

impl NestedTree {
    pub fn new(config: impl Into<Arc<HashConfig>>, structure: Node) -> Result<Self> {
        structure.validate()?;
        debug!(
            "Built nested tree with {} leaves",
            structure.leaf_count()
        );
        Ok(Self {
            config: config.into(),
            structure,
        })
    }

    /// Hash every raw element of `elements` with `leaf_tag`, keeping the shape.
    pub fn from_elements(
        config: impl Into<Arc<HashConfig>>,
        elements: &Node,
        leaf_tag: impl AsRef<[u8]>,
    ) -> Result<Self> {
        elements.validate()?;
        let config = config.into();
        let leaf_tag = leaf_tag.as_ref();
        let structure = elements
            .map_leaves(&|element: &str| bin_to_hex(config.tagged_hash(element, leaf_tag)));
        Self::new(config, structure)
    }

    pub fn structure(&self) -> &Node {
        &self.structure
    }

    pub fn extract_leaves(&self) -> Vec<&str> {
        self.structure.collect_leaves()
    }

    /// Digest of `node` under this tree's config.
    ///
    /// A single-child branch passes its child's digest through unchanged.
    pub fn compute_node_hash(&self, node: &Node) -> Result<Vec<u8>> {
        node.validate()?;
        self.node_hash(node)
    }

    fn node_hash(&self, node: &Node) -> Result<Vec<u8>> {
        match node {
            Node::Leaf(value) => Ok(hex_to_bin(value).into_owned()),
            Node::Branch(children) => match children.as_slice() {
                [only] => self.node_hash(only),
                [left, right] => {
                    let left = self.node_hash(left)?;
                    let right = self.node_hash(right)?;
                    Ok(self.hash_pair(&left, &right))
                }
                other => Err(MerkleError::InvalidChildCount(other.len())),
            },
        }
    }

    /// Walk down to the leaf numbered `target`, then record the siblings of
    /// every node on the way back up.
    fn collect_path(
        &self,
        node: &Node,
        target: usize,
        seen: &mut usize,
        path: &mut ProofPath,
    ) -> Result<bool> {
        let children = match node {
            Node::Leaf(_) => {
                if *seen == target {
                    return Ok(true);
                }
                *seen += 1;
                return Ok(false);
            }
            Node::Branch(children) => children,
        };

        for (position, child) in children.iter().enumerate() {
            if !self.collect_path(child, target, seen, path)? {
                continue;
            }

            for (other, sibling) in children.iter().enumerate() {
                if other == position {
                    continue;
                }
                path.0.push(self.node_hash(sibling)?);
                path.1.push(if other < position {
                    Direction::Left
                } else {
                    Direction::Right
                });
            }
            return Ok(true);
        }
        Ok(false)
    }
}

impl MerkleTreeTrait for NestedTree {
    fn config(&self) -> &Arc<HashConfig> {
        &self.config
    }

    fn leaf_count(&self) -> usize {
        self.structure.leaf_count()
    }

    fn leaf(&self, index: usize) -> Option<&str> {
        self.extract_leaves().get(index).copied()
    }

    fn root_node(&self) -> Result<Vec<u8>> {
        if self.leaf_count() == 0 {
            return Err(MerkleError::EmptyTree);
        }
        self.node_hash(&self.structure)
    }

    fn derive_siblings(&self, index: usize) -> Result<ProofPath> {
        self.check_index(index)?;

        let mut path = (Vec::new(), Vec::new());
        let mut seen = 0;
        if !self.collect_path(&self.structure, index, &mut seen, &mut path)? {
            return Err(MerkleError::InvalidIndex {
                index,
                leaf_count: self.leaf_count(),
            });
        }
        Ok(path)
    }
}
