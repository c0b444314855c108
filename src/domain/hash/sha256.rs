use sha2::{digest::FixedOutput, Digest, Sha256};

/// Single SHA-256 over the concatenation of `parts`.
pub fn sha256(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize_fixed().to_vec()
}

/// Double SHA-256 over the concatenation of `parts`, as Bitcoin hashes
/// transactions and block-level Merkle nodes.
pub fn double_sha256(parts: &[&[u8]]) -> Vec<u8> {
    let once = sha256(parts);

    let mut hasher = Sha256::new();
    hasher.update(once);
    hasher.finalize_fixed().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vectors() {
        assert_eq!(
            hex::encode(sha256(&[&b""[..]])),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex::encode(sha256(&[&b"abc"[..]])),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parts_are_concatenated() {
        assert_eq!(sha256(&[&b"a"[..], &b"bc"[..]]), sha256(&[&b"abc"[..]]));
        assert_eq!(sha256(&[]), sha256(&[&b""[..]]));
    }

    #[test]
    fn test_double_sha256() {
        assert_eq!(
            hex::encode(double_sha256(&[&b""[..]])),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
        assert_eq!(double_sha256(&[&b"abc"[..]]), sha256(&[sha256(&[&b"abc"[..]]).as_slice()]));
    }
}
