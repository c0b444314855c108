use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::digest::hex_to_bin;
use super::error::MerkleError;

pub mod sha256;

/// Tag applied to taproot script leaves.
pub const TAP_LEAF_TAG: &str = "TapLeaf";
/// Tag applied to taproot branch nodes.
pub const TAP_BRANCH_TAG: &str = "TapBranch";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    Sha256,
    #[default]
    DoubleSha256,
}

impl HashAlgorithm {
    /// Hash the concatenation of `parts` with this algorithm.
    pub fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => sha256::sha256(parts),
            HashAlgorithm::DoubleSha256 => sha256::double_sha256(parts),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::DoubleSha256 => "double_sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "double_sha256" => Ok(HashAlgorithm::DoubleSha256),
            other => Err(MerkleError::UnsupportedHashAlgorithm(other.to_owned())),
        }
    }
}

/// Hashing policy shared by trees and the proofs they produce.
///
/// The default value is the legacy Bitcoin policy: double SHA-256, no tags,
/// positional sibling order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashConfig {
    hash_algorithm: HashAlgorithm,
    #[serde(default)]
    leaf_tag: Vec<u8>,
    #[serde(default)]
    branch_tag: Vec<u8>,
    #[serde(default)]
    sort_siblings: bool,
}

impl HashConfig {
    pub fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self {
            hash_algorithm,
            ..Self::default()
        }
    }

    /// Block-level transaction tree as Bitcoin builds it.
    pub fn bitcoin() -> Self {
        Self::default()
    }

    /// BIP-341 script tree: tagged single SHA-256 with canonical sibling order.
    pub fn taptree() -> Self {
        Self::new(HashAlgorithm::Sha256)
            .with_leaf_tag(TAP_LEAF_TAG)
            .with_branch_tag(TAP_BRANCH_TAG)
            .with_sorted_siblings(true)
    }

    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    pub fn with_leaf_tag(mut self, tag: impl AsRef<[u8]>) -> Self {
        self.leaf_tag = tag.as_ref().to_vec();
        self
    }

    pub fn with_branch_tag(mut self, tag: impl AsRef<[u8]>) -> Self {
        self.branch_tag = tag.as_ref().to_vec();
        self
    }

    pub fn with_sorted_siblings(mut self, sort_siblings: bool) -> Self {
        self.sort_siblings = sort_siblings;
        self
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn leaf_tag(&self) -> &[u8] {
        &self.leaf_tag
    }

    pub fn branch_tag(&self) -> &[u8] {
        &self.branch_tag
    }

    pub fn sort_siblings(&self) -> bool {
        self.sort_siblings
    }

    /// Tagged hash of a string, decoding it first when it is pure hex.
    pub fn tagged_hash(&self, data: &str, tag: impl AsRef<[u8]>) -> Vec<u8> {
        self.tagged_hash_bytes(&hex_to_bin(data), tag.as_ref())
    }

    /// Tagged hash of binary data: `H(SHA256(tag) || SHA256(tag) || data)`,
    /// or plain `H(data)` when `tag` is empty.
    pub fn tagged_hash_bytes(&self, data: &[u8], tag: &[u8]) -> Vec<u8> {
        if tag.is_empty() {
            return self.hash_algorithm.digest(&[data]);
        }

        let tag_hash = sha256::sha256(&[tag]);
        self.hash_algorithm.digest(&[tag_hash.as_slice(), tag_hash.as_slice(), data])
    }

    pub fn leaf_hash(&self, data: &str) -> Vec<u8> {
        self.tagged_hash(data, &self.leaf_tag)
    }

    pub fn branch_hash(&self, data: &[u8]) -> Vec<u8> {
        self.tagged_hash_bytes(data, &self.branch_tag)
    }

    /// Concatenate two child digests ahead of branch hashing.
    ///
    /// With `sort_siblings` the smaller operand goes first. Byte order is
    /// the same as the order of their lowercase hex encodings.
    pub fn combine(&self, left: &[u8], right: &[u8]) -> Vec<u8> {
        let (first, second) = if self.sort_siblings && right < left {
            (right, left)
        } else {
            (left, right)
        };

        let mut combined = Vec::with_capacity(first.len() + second.len());
        combined.extend_from_slice(first);
        combined.extend_from_slice(second);
        combined
    }
}
