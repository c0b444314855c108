#![deny(clippy::all)]

#[cfg(feature = "napi")]
#[macro_use]
extern crate napi_derive;

mod domain;
#[cfg(feature = "napi")]
mod interfaces;

pub use domain::digest::{bin_to_hex, hex_to_bin, is_hex_string};
pub use domain::error::{MerkleError, Result};
pub use domain::hash::{HashAlgorithm, HashConfig, TAP_BRANCH_TAG, TAP_LEAF_TAG};
pub use domain::proof::{Direction, Proof};
pub use domain::tree::binary::CompleteBinaryTree;
pub use domain::tree::nested::{NestedTree, Node, MAX_NESTING_DEPTH};
pub use domain::tree::promotion::PromotionTree;
pub use domain::tree::{LevelReduction, MerkleTreeTrait, ProofPath};

#[cfg(feature = "napi")]
#[napi]
pub fn init() {
  let _ = env_logger::try_init();
  std::panic::set_hook(Box::new(|_| {}));
}
