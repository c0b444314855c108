use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use serde_json::Value;

use super::config::{resolve_config, HashOptionsJs};
use super::proof::MerkleProofJs;
use super::to_napi_error;
use crate::domain::hash::HashConfig;
use crate::domain::tree::binary::CompleteBinaryTree;
use crate::domain::tree::nested::{NestedTree, Node};
use crate::domain::tree::promotion::PromotionTree;
use crate::domain::tree::{LevelReduction, MerkleTreeTrait};

pub enum TreeInner {
    Binary(CompleteBinaryTree),
    Promotion(PromotionTree),
    Nested(NestedTree),
}

impl TreeInner {
    /// Build a tree of `kind` from JSON leaves, leaf-hashing them first when
    /// `hash_leaves` is set.
    fn build(
        kind: &str,
        config: Arc<HashConfig>,
        leaves: Value,
        hash_leaves: bool,
    ) -> anyhow::Result<Self> {
        match kind {
            "binary" | "promotion" => {
                let leaves: Vec<String> =
                    serde_json::from_value(leaves).context("leaves must be an array of strings")?;
                let inner = match (kind, hash_leaves) {
                    ("binary", true) => {
                        TreeInner::Binary(CompleteBinaryTree::from_elements(config, &leaves))
                    }
                    ("binary", false) => TreeInner::Binary(CompleteBinaryTree::new(config, leaves)),
                    (_, true) => TreeInner::Promotion(PromotionTree::from_elements(config, &leaves)),
                    (_, false) => TreeInner::Promotion(PromotionTree::new(config, leaves)),
                };
                Ok(inner)
            }
            "nested" => {
                let structure: Node = serde_json::from_value(leaves)
                    .context("leaves must be strings nested in arrays")?;
                let tree = if hash_leaves {
                    let leaf_tag = config.leaf_tag().to_vec();
                    NestedTree::from_elements(config, &structure, leaf_tag)?
                } else {
                    NestedTree::new(config, structure)?
                };
                Ok(TreeInner::Nested(tree))
            }
            other => bail!("unknown tree kind {other}, expected binary, promotion or nested"),
        }
    }

    fn as_tree(&self) -> &dyn MerkleTreeTrait {
        match self {
            TreeInner::Binary(tree) => tree,
            TreeInner::Promotion(tree) => tree,
            TreeInner::Nested(tree) => tree,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            TreeInner::Binary(_) => "binary",
            TreeInner::Promotion(_) => "promotion",
            TreeInner::Nested(_) => "nested",
        }
    }
}

#[napi(js_name = "MerkleTree")]
pub struct MerkleTreeJs {
    inner: TreeInner,
}

#[napi]
impl MerkleTreeJs {
    /// `kind` is `"binary"`, `"promotion"` or `"nested"`. Leaves are hex
    /// digests: a flat array, or nested arrays for the nested kind.
    #[napi(constructor)]
    pub fn new(kind: String, leaves: Value, options: Option<HashOptionsJs>) -> napi::Result<Self> {
        let config = resolve_config(options)?;
        let inner = TreeInner::build(&kind, config, leaves, false).map_err(to_napi_error)?;
        Ok(Self { inner })
    }

    /// Like the constructor, but leaf-hashes raw elements with the leaf tag.
    #[napi(factory)]
    pub fn from_elements(
        kind: String,
        elements: Value,
        options: Option<HashOptionsJs>,
    ) -> napi::Result<Self> {
        let config = resolve_config(options)?;
        let inner = TreeInner::build(&kind, config, elements, true).map_err(to_napi_error)?;
        Ok(Self { inner })
    }

    #[napi(getter)]
    pub fn kind(&self) -> String {
        self.inner.kind().to_owned()
    }

    #[napi]
    pub fn leaf_count(&self) -> u32 {
        self.inner.as_tree().leaf_count() as u32
    }

    /// Leaves in proof index order.
    #[napi]
    pub fn leaves(&self) -> Vec<String> {
        match &self.inner {
            TreeInner::Binary(tree) => tree.leaves().to_vec(),
            TreeInner::Promotion(tree) => tree.leaves().to_vec(),
            TreeInner::Nested(tree) => tree
                .extract_leaves()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Append a leaf digest. Nested trees are fixed once built.
    #[napi]
    pub fn push(&mut self, leaf: String) -> napi::Result<()> {
        match &mut self.inner {
            TreeInner::Binary(tree) => tree.push(leaf),
            TreeInner::Promotion(tree) => tree.push(leaf),
            TreeInner::Nested(_) => {
                return Err(to_napi_error(anyhow!(
                    "nested trees cannot be extended after construction"
                )))
            }
        }
        Ok(())
    }

    #[napi]
    pub fn root(&self) -> napi::Result<String> {
        self.inner
            .as_tree()
            .compute_root()
            .map_err(|err| to_napi_error(err.into()))
    }

    #[napi]
    pub fn generate_proof(&self, index: u32) -> napi::Result<MerkleProofJs> {
        self.inner
            .as_tree()
            .generate_proof(index as usize)
            .map(MerkleProofJs::from_inner)
            .map_err(|err| to_napi_error(err.into()))
    }

    #[napi]
    pub fn leaf_index(&self, leaf: String) -> Option<u32> {
        self.inner
            .as_tree()
            .leaf_index(&leaf)
            .map(|index| index as u32)
    }
}
