use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::digest::{bin_to_hex, hex_to_bin};
use super::error::{MerkleError, Result};
use super::hash::HashConfig;

/// Position of a proof sibling relative to the running hash.
///
/// `Left` means the sibling comes first, so the step hashes `(sib, current)`.
/// `Right` means the sibling comes second, so the step hashes `(current, sib)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Direction {
    Left = 0,
    Right = 1,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction as u8
    }
}

impl TryFrom<u8> for Direction {
    type Error = MerkleError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            other => Err(MerkleError::InvalidProofShape(format!(
                "direction must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// Inclusion proof for one leaf, self-contained and immutable.
///
/// Carries its own [`HashConfig`], so it can be checked without the tree
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProofParts")]
pub struct Proof {
    config: Arc<HashConfig>,
    root: String,
    leaf: String,
    siblings: Vec<String>,
    directions: Vec<Direction>,
}

#[derive(Deserialize)]
struct ProofParts {
    config: Arc<HashConfig>,
    root: String,
    leaf: String,
    siblings: Vec<String>,
    #[serde(default)]
    directions: Vec<Direction>,
}

impl TryFrom<ProofParts> for Proof {
    type Error = MerkleError;

    fn try_from(parts: ProofParts) -> Result<Self> {
        Proof::new(
            parts.config,
            parts.root,
            parts.leaf,
            parts.siblings,
            parts.directions,
        )
    }
}

impl Proof {
    /// Build a proof from its parts.
    ///
    /// With `sort_siblings` the sibling order is canonical and `directions`
    /// must be empty. Otherwise there must be one direction per sibling.
    pub fn new(
        config: Arc<HashConfig>,
        root: impl Into<String>,
        leaf: impl Into<String>,
        siblings: Vec<String>,
        directions: Vec<Direction>,
    ) -> Result<Self> {
        if config.sort_siblings() {
            if !directions.is_empty() {
                return Err(MerkleError::InvalidProofShape(
                    "no directions are required because sort_siblings is enabled".into(),
                ));
            }
        } else if directions.len() != siblings.len() {
            return Err(MerkleError::InvalidProofShape(format!(
                "{} siblings but {} directions",
                siblings.len(),
                directions.len()
            )));
        }

        Ok(Self {
            config,
            root: root.into(),
            leaf: leaf.into(),
            siblings,
            directions,
        })
    }

    pub fn config(&self) -> &Arc<HashConfig> {
        &self.config
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    pub fn siblings(&self) -> &[String] {
        &self.siblings
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Fold the siblings into the leaf and return the resulting root bytes.
    pub fn replay(&self) -> Vec<u8> {
        let config = &self.config;
        let mut current = hex_to_bin(&self.leaf).into_owned();

        if config.sort_siblings() {
            for sibling in &self.siblings {
                let combined = config.combine(&current, &hex_to_bin(sibling));
                current = config.branch_hash(&combined);
            }
            return current;
        }

        for (sibling, direction) in self.siblings.iter().zip_eq(&self.directions) {
            let sibling = hex_to_bin(sibling);
            let combined = match direction {
                Direction::Left => config.combine(&sibling, &current),
                Direction::Right => config.combine(&current, &sibling),
            };
            current = config.branch_hash(&combined);
        }
        current
    }

    /// Hex encoding of [`Proof::replay`].
    pub fn computed_root(&self) -> String {
        bin_to_hex(self.replay())
    }

    /// True when replaying the siblings reproduces `root`.
    pub fn verify(&self) -> bool {
        self.computed_root().eq_ignore_ascii_case(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hash::HashAlgorithm;

    fn leaf(config: &HashConfig, data: &str) -> Vec<u8> {
        config.tagged_hash(data, "")
    }

    fn branch(config: &HashConfig, left: &[u8], right: &[u8]) -> Vec<u8> {
        config.branch_hash(&config.combine(left, right))
    }

    fn bitcoin() -> Arc<HashConfig> {
        Arc::new(HashConfig::bitcoin())
    }

    #[test]
    fn test_no_steps_proof() {
        // With no siblings, the leaf must be the root itself
        let config = bitcoin();
        let leaf_hash = bin_to_hex(leaf(&config, "single_leaf"));

        let proof = Proof::new(config.clone(), &leaf_hash, &leaf_hash, vec![], vec![]).unwrap();
        assert!(proof.verify(), "No-step proof must succeed when leaf == root");

        let random_root = bin_to_hex(leaf(&config, "some_other_data"));
        let proof = Proof::new(config, random_root, &leaf_hash, vec![], vec![]).unwrap();
        assert!(!proof.verify(), "Should fail if root != leaf for a no-step proof");
    }

    #[test]
    fn test_single_step_left() {
        let config = bitcoin();
        let leaf_hash = leaf(&config, "leaf_data");
        let sibling_hash = leaf(&config, "sibling_data");

        let correct_root = bin_to_hex(branch(&config, &sibling_hash, &leaf_hash));
        let proof = Proof::new(
            config.clone(),
            correct_root,
            bin_to_hex(&leaf_hash),
            vec![bin_to_hex(&sibling_hash)],
            vec![Direction::Left],
        )
        .unwrap();
        assert!(proof.verify(), "Proof must succeed if the sibling is on the left");

        let swapped_root = bin_to_hex(branch(&config, &leaf_hash, &sibling_hash));
        let proof = Proof::new(
            config,
            swapped_root,
            bin_to_hex(&leaf_hash),
            vec![bin_to_hex(&sibling_hash)],
            vec![Direction::Left],
        )
        .unwrap();
        assert!(!proof.verify(), "Swapping the order should fail");
    }

    #[test]
    fn test_single_step_right() {
        let config = bitcoin();
        let leaf_hash = leaf(&config, "left_leaf");
        let sibling_hash = leaf(&config, "right_leaf");

        let correct_root = bin_to_hex(branch(&config, &leaf_hash, &sibling_hash));
        let proof = Proof::new(
            config,
            correct_root,
            bin_to_hex(&leaf_hash),
            vec![bin_to_hex(&sibling_hash)],
            vec![Direction::Right],
        )
        .unwrap();
        assert!(proof.verify(), "Right-step proof must succeed with correct order");
    }

    #[test]
    fn test_multi_step_proof() {
        //         R
        //       /   \
        //     N1     N2
        //    /  \   /  \
        //   A    B C    D
        let config = bitcoin();
        let a = leaf(&config, "A");
        let b = leaf(&config, "B");
        let c = leaf(&config, "C");
        let d = leaf(&config, "D");

        let n1 = branch(&config, &a, &b);
        let n2 = branch(&config, &c, &d);
        let r = branch(&config, &n1, &n2);

        // Proof for B: A on the left, then N2 on the right
        let proof = Proof::new(
            config.clone(),
            bin_to_hex(&r),
            bin_to_hex(&b),
            vec![bin_to_hex(&a), bin_to_hex(&n2)],
            vec![Direction::Left, Direction::Right],
        )
        .unwrap();
        assert!(proof.verify(), "Hand-built multi-step proof must match the root");
        assert_eq!(proof.computed_root(), bin_to_hex(&r));

        let fake_root = bin_to_hex(leaf(&config, "fake_root"));
        let proof = Proof::new(
            config,
            fake_root,
            bin_to_hex(&b),
            vec![bin_to_hex(&a), bin_to_hex(&n2)],
            vec![Direction::Left, Direction::Right],
        )
        .unwrap();
        assert!(!proof.verify(), "Wrong root must fail");
    }

    #[test]
    fn test_sorted_proof_ignores_position() {
        let config = Arc::new(HashConfig::new(HashAlgorithm::Sha256).with_sorted_siblings(true));
        let leaf_hash = leaf(&config, "leaf");
        let sibling_hash = leaf(&config, "sibling");

        let root = bin_to_hex(branch(&config, &sibling_hash, &leaf_hash));
        assert_eq!(root, bin_to_hex(branch(&config, &leaf_hash, &sibling_hash)));

        let proof = Proof::new(
            config,
            root,
            bin_to_hex(&leaf_hash),
            vec![bin_to_hex(&sibling_hash)],
            vec![],
        )
        .unwrap();
        assert!(proof.verify());
    }

    #[test]
    fn test_root_comparison_ignores_case() {
        let config = bitcoin();
        let leaf_hash = bin_to_hex(leaf(&config, "leaf"));
        let proof = Proof::new(config, leaf_hash.to_uppercase(), &leaf_hash, vec![], vec![]).unwrap();
        assert!(proof.verify());
    }

    #[test]
    fn test_malicious_direction_fails() {
        let config = bitcoin();
        let leaf_hash = leaf(&config, "victim_leaf");
        let sibling_hash = leaf(&config, "sibling_data");

        // The real sibling sits on the right; claim it is on the left
        let correct_root = bin_to_hex(branch(&config, &leaf_hash, &sibling_hash));
        let proof = Proof::new(
            config,
            correct_root,
            bin_to_hex(&leaf_hash),
            vec![bin_to_hex(&sibling_hash)],
            vec![Direction::Right.flip()],
        )
        .unwrap();
        assert!(!proof.verify(), "Flipping a direction must fail");
    }

    #[test]
    fn test_directions_forbidden_when_sorted() {
        let config = Arc::new(HashConfig::taptree());
        let result = Proof::new(
            config,
            "00",
            "00",
            vec!["11".into()],
            vec![Direction::Left],
        );
        assert!(matches!(result, Err(MerkleError::InvalidProofShape(_))));
    }

    #[test]
    fn test_direction_count_must_match() {
        let result = Proof::new(
            bitcoin(),
            "00",
            "00",
            vec!["11".into(), "22".into()],
            vec![Direction::Left],
        );
        let err = result.unwrap_err();
        assert_eq!(
            err,
            MerkleError::InvalidProofShape("2 siblings but 1 directions".into())
        );
    }

    #[test]
    fn test_direction_codes() {
        assert_eq!(u8::from(Direction::Left), 0);
        assert_eq!(u8::from(Direction::Right), 1);
        assert_eq!(Direction::try_from(1), Ok(Direction::Right));
        assert!(Direction::try_from(2).is_err());
    }

    #[test]
    fn test_serde_restores_and_validates() {
        let config = bitcoin();
        let a = leaf(&config, "A");
        let b = leaf(&config, "B");
        let root = branch(&config, &a, &b);
        let proof = Proof::new(
            config,
            bin_to_hex(&root),
            bin_to_hex(&a),
            vec![bin_to_hex(&b)],
            vec![Direction::Right],
        )
        .unwrap();

        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["directions"], serde_json::json!([1]));
        let restored: Proof = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(restored, proof);
        assert!(restored.verify());

        let mut broken = json;
        broken["directions"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Proof>(broken).is_err());
    }
}
