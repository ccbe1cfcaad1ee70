//! # Content Digests
//!
//! MD5 is the checksum recorded for every uploaded file. It identifies
//! duplicate uploads and verifies downloaded bytes; it is not used for
//! anything security-sensitive.

use std::io::{self, Read};

use md5::{Digest, Md5};

use crate::error::ValidationError;

/// Hex length of an MD5 digest.
pub const MD5_HEX_LEN: usize = 32;

/// Hex length of a git (SHA-1) commit hash.
pub const COMMIT_HASH_HEX_LEN: usize = 40;

const CHUNK_SIZE: usize = 64 * 1024;

/// MD5 of an in-memory buffer as lowercase hex.
pub fn md5_hex(data: &[u8]) -> String {
    to_hex(&Md5::digest(data))
}

/// MD5 of everything readable from `reader`, streamed in fixed-size chunks.
pub fn md5_hex_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

/// Validate a hex digest of the given length and normalize it to lowercase.
pub fn validate_hex(
    field: &'static str,
    value: &str,
    expected: usize,
) -> Result<String, ValidationError> {
    if value.len() != expected || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::HexDigest {
            field,
            expected,
            value: value.to_string(),
        });
    }
    Ok(value.to_ascii_lowercase())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
