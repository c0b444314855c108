use std::sync::Arc;

use anyhow::{bail, Context};

use super::to_napi_error;
use crate::domain::hash::{HashAlgorithm, HashConfig};

/// Hashing options passed from JavaScript.
///
/// Fields left unset keep the value of the chosen preset.
#[napi(object, js_name = "HashOptions")]
#[derive(Clone, Default)]
pub struct HashOptionsJs {
    /// `"bitcoin"` (the default) or `"taptree"`.
    pub preset: Option<String>,
    /// `"sha256"` or `"double_sha256"`.
    pub hash_algorithm: Option<String>,
    pub leaf_tag: Option<String>,
    pub branch_tag: Option<String>,
    pub sort_siblings: Option<bool>,
}

impl HashOptionsJs {
    pub fn to_config(&self) -> anyhow::Result<HashConfig> {
        let mut config = match self.preset.as_deref() {
            None | Some("bitcoin") => HashConfig::bitcoin(),
            Some("taptree") => HashConfig::taptree(),
            Some(other) => bail!("unknown preset {other}, expected bitcoin or taptree"),
        };

        if let Some(name) = &self.hash_algorithm {
            let algorithm: HashAlgorithm = name.parse().context("invalid hashAlgorithm")?;
            config = config.with_hash_algorithm(algorithm);
        }
        if let Some(tag) = &self.leaf_tag {
            config = config.with_leaf_tag(tag);
        }
        if let Some(tag) = &self.branch_tag {
            config = config.with_branch_tag(tag);
        }
        if let Some(sort_siblings) = self.sort_siblings {
            config = config.with_sorted_siblings(sort_siblings);
        }
        Ok(config)
    }
}

pub(crate) fn resolve_config(options: Option<HashOptionsJs>) -> napi::Result<Arc<HashConfig>> {
    options
        .unwrap_or_default()
        .to_config()
        .map(Arc::new)
        .map_err(to_napi_error)
}
