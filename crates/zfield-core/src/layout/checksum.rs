// crates/zfield-core/src/layout/checksum.rs
//
// Integrity trailer appended to every encoded layout:
//   crc32:u32       (over the body)
//   blake3_16:[16]  (over the body and the crc32)

use crate::error::{CodecError, Result};

pub const TRAILER_LEN: usize = 4 + 16;

pub fn crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

pub fn blake3_16(bytes: &[u8]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out.copy_from_slice(&blake3::hash(bytes).as_bytes()[..16]);
    out
}

/// Append the trailer to `body`.
pub fn seal(body: &mut Vec<u8>) {
    let c = crc32(body);
    body.extend_from_slice(&c.to_le_bytes());
    let h = blake3_16(body);
    body.extend_from_slice(&h);
}

/// Verify the trailer and return the body it covers.
pub fn unseal(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.len() < TRAILER_LEN {
        return Err(CodecError::LayoutFormat("unexpected eof reading trailer".into()));
    }
    let (covered, hash) = bytes.split_at(bytes.len() - 16);
    let (body, crc) = covered.split_at(covered.len() - 4);

    let mut crc_le = [0u8; 4];
    crc_le.copy_from_slice(crc);
    if u32::from_le_bytes(crc_le) != crc32(body) {
        return Err(CodecError::LayoutFormat("crc32 mismatch".into()));
    }
    if hash != blake3_16(covered).as_slice() {
        return Err(CodecError::LayoutFormat("blake3 mismatch".into()));
    }
    Ok(body)
}
