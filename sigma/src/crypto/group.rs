//! secp256k1 group elements and scalars in their canonical wire encodings
//!
//! Point encoding (34 bytes): `x` big-endian (32) || `y` parity (0/1) || infinity flag (0/1).
//! The point at infinity is 33 zero bytes followed by `1`.
//! Scalar encoding (32 bytes): big-endian, strictly below the group order.

use std::fmt;

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256};

use crate::error::{SigmaError, SigmaResult};

/// Encoded size of a group element
pub const GROUP_ELEMENT_SIZE: usize = 34;

/// Encoded size of a scalar
pub const SCALAR_SIZE: usize = 32;

const SEC1_EVEN: u8 = 0x02;
const SEC1_ODD: u8 = 0x03;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GroupElement(ProjectivePoint);

impl GroupElement {
    pub fn identity() -> Self {
        Self(ProjectivePoint::IDENTITY)
    }

    pub fn from_point(point: ProjectivePoint) -> Self {
        Self(point)
    }

    pub fn point(&self) -> &ProjectivePoint {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    pub fn to_bytes(&self) -> [u8; GROUP_ELEMENT_SIZE] {
        let mut out = [0u8; GROUP_ELEMENT_SIZE];
        if self.is_identity() {
            out[33] = 1;
            return out;
        }

        let encoded = self.0.to_affine().to_encoded_point(true);
        let sec1 = encoded.as_bytes();
        out[..32].copy_from_slice(&sec1[1..33]);
        out[32] = u8::from(sec1[0] == SEC1_ODD);
        out
    }

    pub fn from_bytes(bytes: &[u8; GROUP_ELEMENT_SIZE]) -> SigmaResult<Self> {
        match bytes[33] {
            1 => {
                if bytes[..33].iter().any(|&b| b != 0) {
                    return Err(SigmaError::SerializationError(
                        "point at infinity carries coordinate data".into(),
                    ));
                }
                return Ok(Self::identity());
            }
            0 => {}
            flag => {
                return Err(SigmaError::SerializationError(format!(
                    "invalid infinity flag {flag}"
                )))
            }
        }

        let prefix = match bytes[32] {
            0 => SEC1_EVEN,
            1 => SEC1_ODD,
            parity => {
                return Err(SigmaError::SerializationError(format!(
                    "invalid parity byte {parity}"
                )))
            }
        };

        let mut sec1 = [0u8; 33];
        sec1[0] = prefix;
        sec1[1..].copy_from_slice(&bytes[..32]);

        let affine = decompress(&sec1)
            .ok_or_else(|| SigmaError::SerializationError("x coordinate is not on the curve".into()))?;

        Ok(Self(ProjectivePoint::from(affine)))
    }

    pub fn from_slice(bytes: &[u8]) -> SigmaResult<Self> {
        let fixed: [u8; GROUP_ELEMENT_SIZE] = bytes.try_into().map_err(|_| {
            SigmaError::SerializationError(format!(
                "group element must be {GROUP_ELEMENT_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Self::from_bytes(&fixed)
    }
}

impl fmt::Debug for GroupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupElement({})", hex::encode(self.to_bytes()))
    }
}

/// Decode a compressed SEC1 point; `None` when `x` is not on the curve
pub(crate) fn decompress(sec1: &[u8; 33]) -> Option<AffinePoint> {
    let encoded = EncodedPoint::from_bytes(sec1).ok()?;
    Option::from(AffinePoint::from_encoded_point(&encoded))
}

// ============================================================================
// Scalar helpers
// ============================================================================

pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_SIZE] {
    let mut out = [0u8; SCALAR_SIZE];
    out.copy_from_slice(&scalar.to_bytes());
    out
}

/// Canonical decode; values at or above the group order are rejected
pub fn scalar_from_bytes(bytes: &[u8; SCALAR_SIZE]) -> SigmaResult<Scalar> {
    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
        .ok_or_else(|| SigmaError::SerializationError("scalar is not canonical".into()))
}

/// Wide-to-narrow reduction of a 32-byte digest
pub fn scalar_from_digest(bytes: &[u8; SCALAR_SIZE]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*bytes))
}

pub fn is_zero_scalar(scalar: &Scalar) -> bool {
    bool::from(scalar.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_roundtrip() {
        let g = GroupElement::from_point(ProjectivePoint::GENERATOR);
        let bytes = g.to_bytes();
        assert_eq!(bytes[33], 0);
        assert_eq!(GroupElement::from_bytes(&bytes).unwrap(), g);
    }

    #[test]
    fn test_negation_flips_parity_only() {
        let g = ProjectivePoint::GENERATOR;
        let a = GroupElement::from_point(g).to_bytes();
        let b = GroupElement::from_point(-g).to_bytes();
        assert_eq!(a[..32], b[..32]);
        assert_ne!(a[32], b[32]);
    }

    #[test]
    fn test_identity_encoding() {
        let bytes = GroupElement::identity().to_bytes();
        assert!(bytes[..33].iter().all(|&b| b == 0));
        assert_eq!(bytes[33], 1);
        assert!(GroupElement::from_bytes(&bytes).unwrap().is_identity());
    }

    #[test]
    fn test_rejects_bad_flags() {
        let mut bytes = GroupElement::from_point(ProjectivePoint::GENERATOR).to_bytes();
        bytes[32] = 2;
        assert!(GroupElement::from_bytes(&bytes).is_err());

        let mut bytes = GroupElement::from_point(ProjectivePoint::GENERATOR).to_bytes();
        bytes[33] = 7;
        assert!(GroupElement::from_bytes(&bytes).is_err());

        let mut bytes = GroupElement::identity().to_bytes();
        bytes[0] = 1;
        assert!(GroupElement::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_x_beyond_field() {
        let mut bytes = [0xffu8; GROUP_ELEMENT_SIZE];
        bytes[32] = 0;
        bytes[33] = 0;
        assert!(GroupElement::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_rejects_x_off_curve() {
        // x^3 + 7 is a non-residue for x = 5
        let mut sec1 = [0u8; 33];
        sec1[0] = 0x02;
        sec1[32] = 5;
        assert!(decompress(&sec1).is_none());

        let mut bytes = [0u8; GROUP_ELEMENT_SIZE];
        bytes[31] = 5;
        assert!(GroupElement::from_bytes(&bytes).is_err());

        sec1[32] = 4;
        assert!(decompress(&sec1).is_some());
    }

    #[test]
    fn test_scalar_canonical_decode() {
        let s = Scalar::from(123_456u64);
        assert_eq!(scalar_from_bytes(&scalar_to_bytes(&s)).unwrap(), s);
        assert!(scalar_from_bytes(&[0xff; 32]).is_err());
    }

    #[test]
    fn test_digest_reduction_accepts_any_input() {
        let reduced = scalar_from_digest(&[0xff; 32]);
        assert!(!is_zero_scalar(&reduced));
    }
}
