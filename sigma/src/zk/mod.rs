//! Zero-knowledge layer
//!
//! The mint/spend orchestration only talks to a [`ProofEngine`]. The bundled
//! [`SigmaEngine`] binds a one-of-many proof to an ECDSA signature made with
//! the key the serial number is derived from.

pub mod r1;
pub mod sigma;

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, VerifyingKey};
use rand::rngs::OsRng;
use tracing::{debug, warn};

use crate::coin::PrivateCoin;
use crate::crypto::keys::spend_public_key;
use crate::crypto::{is_zero_scalar, serial_from_public_key, ProtocolParams, ECDSA_SIGNATURE_SIZE};
use crate::error::{SigmaError, SigmaResult};
use crate::spend::{AnonymitySet, CoinSpend, SpendMetadata};

pub use self::sigma::{SigmaProof, SIGMA_PROOF_SIZE};

/// Prove and verify spends of a coin from an anonymity set
pub trait ProofEngine {
    fn prove(
        &self,
        coin: &PrivateCoin,
        set: &AnonymitySet,
        metadata: &SpendMetadata,
        extended_checks: bool,
    ) -> SigmaResult<CoinSpend>;

    fn verify(
        &self,
        spend: &CoinSpend,
        set: &AnonymitySet,
        metadata: &SpendMetadata,
        extended_checks: bool,
    ) -> bool;
}

/// One-of-many engine over the shared protocol parameters
#[derive(Debug, Clone, Copy)]
pub struct SigmaEngine {
    params: &'static ProtocolParams,
}

impl SigmaEngine {
    pub fn new() -> Self {
        Self {
            params: ProtocolParams::get(),
        }
    }
}

impl Default for SigmaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProofEngine for SigmaEngine {
    fn prove(
        &self,
        coin: &PrivateCoin,
        set: &AnonymitySet,
        metadata: &SpendMetadata,
        extended_checks: bool,
    ) -> SigmaResult<CoinSpend> {
        let serial = coin.serial();
        if extended_checks && is_zero_scalar(&serial) {
            return Err(SigmaError::ProofVerificationFailed);
        }

        let position = set.position_of(&coin.public_coin()).ok_or_else(|| {
            warn!(
                denomination = %coin.denomination(),
                set_size = set.len(),
                "coin is not a member of the anonymity set"
            );
            SigmaError::ProofVerificationFailed
        })?;

        let commits = set.shifted_commitments(&serial, self.params);
        let proof = sigma::prove(
            self.params,
            &commits,
            position,
            &coin.randomness(),
            coin.version().pads_anonymity_set(),
            &mut OsRng,
        )?;
        debug!(set_size = set.len(), version = %coin.version(), "built one-of-many proof");

        let mut spend = CoinSpend::unsigned(
            coin.denomination(),
            coin.version(),
            metadata,
            serial,
            proof,
            spend_public_key(coin.spend_key()),
        );
        let digest = spend.signature_hash(metadata.tx_hash());
        let signature: Signature = coin
            .spend_key()
            .sign_prehash(&digest)
            .map_err(|e| SigmaError::Derivation(format!("spend signature failed: {e}")))?;

        let mut signature_bytes = [0u8; ECDSA_SIGNATURE_SIZE];
        signature_bytes.copy_from_slice(&signature.to_bytes());
        spend.set_signature(signature_bytes);

        Ok(spend)
    }

    fn verify(
        &self,
        spend: &CoinSpend,
        set: &AnonymitySet,
        metadata: &SpendMetadata,
        extended_checks: bool,
    ) -> bool {
        if spend.denomination() != set.denomination() {
            debug!(
                spend = %spend.denomination(),
                set = %set.denomination(),
                "denomination mismatch"
            );
            return false;
        }
        if spend.group_id() != metadata.group_id() || spend.block_hash() != metadata.block_hash() {
            debug!(group_id = spend.group_id(), "spend metadata mismatch");
            return false;
        }

        let serial = spend.serial();
        if extended_checks && is_zero_scalar(&serial) {
            return false;
        }
        if serial_from_public_key(spend.public_key()) != serial {
            debug!("serial does not match the signing key");
            return false;
        }

        let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(spend.public_key()) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(spend.signature()) else {
            return false;
        };
        let digest = spend.signature_hash(metadata.tx_hash());
        if verifying_key.verify_prehash(&digest, &signature).is_err() {
            debug!("spend signature rejected");
            return false;
        }

        let commits = set.shifted_commitments(&serial, self.params);
        sigma::verify(
            self.params,
            &commits,
            spend.proof(),
            spend.version().pads_anonymity_set(),
            extended_checks,
        )
    }
}
