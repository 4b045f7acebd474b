//! Deterministic coin derivation
//!
//! (master key, index, denomination) always maps to the same private coin, so
//! a wallet can re-derive any coin at spend time from its index alone.
//!
//! Commitment: `C = serial·g + randomness·h0`

use std::fmt;

use k256::ecdsa::SigningKey;
use k256::Scalar;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::crypto::keys::expand_coin_secrets;
use crate::crypto::{is_zero_scalar, GroupElement, MasterKey, ProtocolParams, SecretScalar};
use crate::denomination::Denomination;
use crate::error::{SigmaError, SigmaResult};

// ============================================================================
// Protocol Version
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtocolVersion {
    /// Sigma 3.0: proofs cover exactly the supplied anonymity set
    V3_0,
    /// Sigma 3.1: short anonymity sets are padded with their last coin
    #[default]
    V3_1,
}

impl ProtocolVersion {
    pub fn number(self) -> u32 {
        match self {
            ProtocolVersion::V3_0 => 30,
            ProtocolVersion::V3_1 => 31,
        }
    }

    pub fn pads_anonymity_set(self) -> bool {
        matches!(self, ProtocolVersion::V3_1)
    }
}

impl TryFrom<u32> for ProtocolVersion {
    type Error = SigmaError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            30 => Ok(ProtocolVersion::V3_0),
            31 => Ok(ProtocolVersion::V3_1),
            other => Err(SigmaError::UnsupportedProtocolVersion(other)),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ============================================================================
// Public Coin
// ============================================================================

/// What the ledger sees of a mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicCoin {
    pub value: GroupElement,
    pub denomination: Denomination,
}

impl PublicCoin {
    pub fn new(value: GroupElement, denomination: Denomination) -> Self {
        Self { value, denomination }
    }
}

// ============================================================================
// Private Coin
// ============================================================================

/// A derived coin with its secrets. Lives only for one operation.
///
/// Clone is NOT derived to prevent accidental secret duplication.
pub struct PrivateCoin {
    denomination: Denomination,
    version: ProtocolVersion,
    serial: SecretScalar,
    randomness: SecretScalar,
    spend_key: SigningKey,
    commitment: GroupElement,
}

impl PrivateCoin {
    pub fn denomination(&self) -> Denomination {
        self.denomination
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn public_coin(&self) -> PublicCoin {
        PublicCoin::new(self.commitment, self.denomination)
    }

    pub fn commitment(&self) -> &GroupElement {
        &self.commitment
    }

    pub fn serial_bytes(&self) -> [u8; 32] {
        *self.serial.as_bytes()
    }

    pub(crate) fn serial(&self) -> Scalar {
        self.serial.to_scalar()
    }

    pub(crate) fn randomness(&self) -> Scalar {
        self.randomness.to_scalar()
    }

    pub(crate) fn spend_key(&self) -> &SigningKey {
        &self.spend_key
    }
}

impl PartialEq for PrivateCoin {
    fn eq(&self, other: &Self) -> bool {
        self.denomination == other.denomination
            && self.version == other.version
            && self.commitment == other.commitment
            && bool::from(self.serial.ct_eq(&other.serial) & self.randomness.ct_eq(&other.randomness))
    }
}

impl fmt::Debug for PrivateCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateCoin")
            .field("denomination", &self.denomination)
            .field("version", &self.version)
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}

/// Derive the private coin at `index`.
///
/// The denomination is part of the key schedule, so one index yields a
/// distinct coin per denomination. Both supported protocol versions share the
/// schedule; the version is carried on the coin and decides how its spend
/// proof is built.
pub fn derive_coin(
    denomination: Denomination,
    master: &MasterKey,
    index: u32,
    version: ProtocolVersion,
) -> SigmaResult<PrivateCoin> {
    let secrets = expand_coin_secrets(master, denomination, index)?;
    let serial = secrets.serial.to_scalar();
    let randomness = secrets.randomness.to_scalar();

    if is_zero_scalar(&serial) || is_zero_scalar(&randomness) {
        return Err(SigmaError::Derivation(format!(
            "zero coin secret at index {index}"
        )));
    }

    let params = ProtocolParams::get();
    let commitment = GroupElement::from_point(params.g * serial + params.h0() * &randomness);

    debug!(%denomination, index, version = %version, "derived private coin");

    Ok(PrivateCoin {
        denomination,
        version,
        serial: secrets.serial,
        randomness: secrets.randomness,
        spend_key: secrets.spend_key,
        commitment,
    })
}

/// Derive with a protocol version number as received from a caller
pub fn derive_coin_with_version_number(
    denomination: Denomination,
    master: &MasterKey,
    index: u32,
    version: u32,
) -> SigmaResult<PrivateCoin> {
    derive_coin(denomination, master, index, ProtocolVersion::try_from(version)?)
}

/// Canonical bytes of the coin's secrets and commitment, for equality checks
/// across independent derivations
#[cfg(test)]
pub(crate) fn coin_fingerprint(coin: &PrivateCoin) -> Vec<u8> {
    use crate::crypto::scalar_to_bytes;

    let mut out = Vec::with_capacity(32 + 32 + 34);
    out.extend_from_slice(&scalar_to_bytes(&coin.serial()));
    out.extend_from_slice(&scalar_to_bytes(&coin.randomness()));
    out.extend_from_slice(&coin.commitment().to_bytes());
    out
}
