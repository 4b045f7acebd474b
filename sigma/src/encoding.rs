//! Binary <-> text conventions shared by every payload crossing the crate boundary
//!
//! All keys, commitments, proofs, serial numbers and hashes travel as lowercase
//! hex: two characters per byte, no separators, no `0x` prefix.

use std::fmt;

use crate::error::{SigmaError, SigmaResult};

/// Encode bytes as lowercase hex
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex of any even length
pub fn decode_hex(text: &str) -> SigmaResult<Vec<u8>> {
    hex::decode(text).map_err(|e| SigmaError::InvalidHex(e.to_string()))
}

/// Decode hex that must describe exactly `N` bytes
pub fn decode_hex_fixed<const N: usize>(text: &str) -> SigmaResult<[u8; N]> {
    if text.len() != N * 2 {
        return Err(SigmaError::InvalidHex(format!(
            "expected {} hex characters, got {}",
            N * 2,
            text.len()
        )));
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(text, &mut out).map_err(|e| SigmaError::InvalidHex(e.to_string()))?;
    Ok(out)
}

// ============================================================================
// 256-bit identifiers
// ============================================================================

/// A block or transaction hash.
///
/// Stored in internal byte order. The hex form is the conventional display
/// order, which is the byte-reversed internal order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse the 64-character display form
    pub fn from_hex(text: &str) -> SigmaResult<Self> {
        let mut bytes = decode_hex_fixed::<32>(text)?;
        bytes.reverse();
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        let mut display = self.0;
        display.reverse();
        encode_hex(&display)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Fixed-layout reader
// ============================================================================

/// Cursor over a fixed-layout buffer. Every short read is a malformed proof.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn take<const N: usize>(&mut self) -> SigmaResult<[u8; N]> {
        let end = self.pos + N;
        if end > self.buf.len() {
            return Err(SigmaError::MalformedProof(format!(
                "unexpected end of data at offset {}",
                self.pos
            )));
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(out)
    }

    pub(crate) fn read_u32_le(&mut self) -> SigmaResult<u32> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }

    pub(crate) fn read_i64_le(&mut self) -> SigmaResult<i64> {
        Ok(i64::from_le_bytes(self.take::<8>()?))
    }

    pub(crate) fn finish(self) -> SigmaResult<()> {
        if self.pos != self.buf.len() {
            return Err(SigmaError::MalformedProof(format!(
                "{} trailing bytes",
                self.buf.len() - self.pos
            )));
        }
        Ok(())
    }
}
