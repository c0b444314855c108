//! Hex/raw digest conventions shared by every tree.
//!
//! A non-empty string made only of hex characters is treated as an encoded
//! digest and decoded before hashing. Anything else is hashed as its raw
//! UTF-8 bytes. A raw payload that happens to look like hex is therefore
//! decoded too; callers hashing free-form text must avoid pure-hex values.

use std::borrow::Cow;

/// True when `data` is non-empty and consists only of `[0-9a-fA-F]`.
pub fn is_hex_string(data: &str) -> bool {
    !data.is_empty() && data.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decode `data` when it is a hex string, otherwise borrow its raw bytes.
///
/// Odd-length hex has its last nibble padded with a zero on the right, so
/// `"abc"` decodes to `[0xab, 0xc0]`.
pub fn hex_to_bin(data: &str) -> Cow<'_, [u8]> {
    if !is_hex_string(data) {
        return Cow::Borrowed(data.as_bytes());
    }

    let decoded = if data.len() % 2 == 0 {
        hex::decode(data)
    } else {
        hex::decode(format!("{data}0"))
    };

    match decoded {
        Ok(bytes) => Cow::Owned(bytes),
        Err(_) => Cow::Borrowed(data.as_bytes()),
    }
}

/// Lowercase hex encoding of a binary digest.
pub fn bin_to_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(data)
}
