use anyhow::{anyhow, Context};

use super::config::{resolve_config, HashOptionsJs};
use super::to_napi_error;
use crate::domain::proof::{Direction, Proof};

/// JavaScript-facing inclusion proof.
#[napi(js_name = "MerkleProof")]
pub struct MerkleProofJs {
    inner: Proof,
}

#[napi]
impl MerkleProofJs {
    /// Directions are `0` (sibling on the left) or `1` (sibling on the right),
    /// and must be omitted when the options sort siblings.
    #[napi(constructor)]
    pub fn new(
        root: String,
        leaf: String,
        siblings: Vec<String>,
        directions: Option<Vec<u32>>,
        options: Option<HashOptionsJs>,
    ) -> napi::Result<Self> {
        let config = resolve_config(options)?;
        let directions = directions
            .unwrap_or_default()
            .into_iter()
            .map(|code| {
                u8::try_from(code)
                    .ok()
                    .and_then(|code| Direction::try_from(code).ok())
                    .ok_or_else(|| anyhow!("direction must be 0 or 1, got {code}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(to_napi_error)?;

        let inner = Proof::new(config, root, leaf, siblings, directions)
            .map_err(|err| to_napi_error(err.into()))?;
        Ok(Self { inner })
    }

    pub(crate) fn from_inner(inner: Proof) -> Self {
        MerkleProofJs { inner }
    }

    #[napi(factory)]
    pub fn from_json(json: String) -> napi::Result<Self> {
        let inner = serde_json::from_str::<Proof>(&json)
            .context("malformed proof JSON")
            .map_err(to_napi_error)?;
        Ok(Self { inner })
    }

    #[napi]
    pub fn to_json(&self) -> napi::Result<String> {
        serde_json::to_string(&self.inner)
            .context("failed to serialize proof")
            .map_err(to_napi_error)
    }

    #[napi]
    pub fn verify(&self) -> bool {
        self.inner.verify()
    }

    /// Root obtained by replaying the siblings from the leaf.
    #[napi]
    pub fn computed_root(&self) -> String {
        self.inner.computed_root()
    }

    #[napi(getter)]
    pub fn root(&self) -> String {
        self.inner.root().to_owned()
    }

    #[napi(getter)]
    pub fn leaf(&self) -> String {
        self.inner.leaf().to_owned()
    }

    #[napi(getter)]
    pub fn siblings(&self) -> Vec<String> {
        self.inner.siblings().to_vec()
    }

    #[napi(getter)]
    pub fn directions(&self) -> Vec<u32> {
        self.inner
            .directions()
            .iter()
            .map(|direction| u8::from(*direction) as u32)
            .collect()
    }
}
