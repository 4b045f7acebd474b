//! Secret key material and the per-coin key schedule
//!
//! Security features:
//! - Master key bytes and derived scalars are zeroized on drop
//! - Clone is NOT derived on the master key to prevent accidental copies
//! - Constant-time comparison for secret values

use std::fmt;

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::Scalar;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::crypto::group::{scalar_from_digest, scalar_to_bytes};
use crate::denomination::Denomination;
use crate::encoding::decode_hex_fixed;
use crate::error::{SigmaError, SigmaResult};

/// Length of the wallet-supplied master secret
pub const MASTER_KEY_SIZE: usize = 32;

/// Compressed secp256k1 public key
pub const ECDSA_PUBKEY_SIZE: usize = 33;

/// Compact `r || s` signature
pub const ECDSA_SIGNATURE_SIZE: usize = 64;

/// Domain separator for expanding (master, index) into a coin seed
const SEED_DOMAIN: &[u8] = b"sigma_coin_seed_v3";

/// Domain separator for hashing the spend public key into a serial number
const SERIAL_DOMAIN: &[u8] = b"sigma_serial_v3";

/// Domain separator for the commitment blinding factor
const RANDOMNESS_DOMAIN: &[u8] = b"sigma_randomness_v3";

// ============================================================================
// Zeroizing Scalar Wrapper
// ============================================================================

/// A scalar that zeroizes its contents on drop
#[derive(Clone)]
pub struct SecretScalar {
    bytes: [u8; 32],
}

impl SecretScalar {
    pub fn from_scalar(scalar: &Scalar) -> Self {
        Self { bytes: scalar_to_bytes(scalar) }
    }

    pub fn to_scalar(&self) -> Scalar {
        scalar_from_digest(&self.bytes)
    }

    /// Get the raw bytes (use carefully)
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl ConstantTimeEq for SecretScalar {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.bytes.ct_eq(&other.bytes)
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

// ============================================================================
// Master Key
// ============================================================================

/// The wallet's secret from which every coin is derived.
///
/// Owned by the caller; this crate never persists it.
pub struct MasterKey {
    bytes: [u8; MASTER_KEY_SIZE],
}

impl MasterKey {
    pub fn from_bytes(bytes: &[u8]) -> SigmaResult<Self> {
        let bytes: [u8; MASTER_KEY_SIZE] = bytes.try_into().map_err(|_| {
            SigmaError::InvalidKeyMaterial(format!(
                "expected {MASTER_KEY_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    pub fn from_hex(text: &str) -> SigmaResult<Self> {
        let mut bytes = decode_hex_fixed::<MASTER_KEY_SIZE>(text.trim())
            .map_err(|e| SigmaError::InvalidKeyMaterial(e.to_string()))?;
        let key = Self { bytes };
        bytes.zeroize();
        Ok(key)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; MASTER_KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

// ============================================================================
// Coin Key Schedule
// ============================================================================

/// Secrets expanded from (master, index)
pub(crate) struct CoinSecrets {
    pub(crate) spend_key: SigningKey,
    pub(crate) serial: SecretScalar,
    pub(crate) randomness: SecretScalar,
}

/// seed = SHA512(domain || master || denomination_le || index_le)
/// spend key = seed[..32], randomness = H(domain || seed[32..])
/// serial = H(domain || compressed spend pubkey)
pub(crate) fn expand_coin_secrets(
    master: &MasterKey,
    denomination: Denomination,
    index: u32,
) -> SigmaResult<CoinSecrets> {
    let mut hasher = Sha512::new();
    hasher.update(SEED_DOMAIN);
    hasher.update(master.as_bytes());
    hasher.update(denomination.value().to_le_bytes());
    hasher.update(index.to_le_bytes());
    let mut seed = [0u8; 64];
    seed.copy_from_slice(&hasher.finalize());

    let spend_key = SigningKey::from_slice(&seed[..32])
        .map_err(|_| SigmaError::Derivation(format!("degenerate spend key at index {index}")));

    let mut randomness_hasher = Sha256::new();
    randomness_hasher.update(RANDOMNESS_DOMAIN);
    randomness_hasher.update(&seed[32..]);
    let mut randomness_digest = [0u8; 32];
    randomness_digest.copy_from_slice(&randomness_hasher.finalize());
    let randomness = scalar_from_digest(&randomness_digest);

    seed.zeroize();
    randomness_digest.zeroize();

    let spend_key = spend_key?;
    let serial = serial_from_public_key(&spend_public_key(&spend_key));

    Ok(CoinSecrets {
        spend_key,
        serial: SecretScalar::from_scalar(&serial),
        randomness: SecretScalar::from_scalar(&randomness),
    })
}

pub(crate) fn spend_public_key(key: &SigningKey) -> [u8; ECDSA_PUBKEY_SIZE] {
    let encoded = key.verifying_key().as_affine().to_encoded_point(true);
    let mut out = [0u8; ECDSA_PUBKEY_SIZE];
    out.copy_from_slice(encoded.as_bytes());
    out
}

/// The serial number is bound to the key that signs the spend
pub fn serial_from_public_key(pubkey: &[u8; ECDSA_PUBKEY_SIZE]) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(SERIAL_DOMAIN);
    hasher.update(pubkey);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    scalar_from_digest(&digest)
}
