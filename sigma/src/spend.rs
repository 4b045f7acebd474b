//! Spend construction and verification
//!
//! A spend reveals the coin's serial number and proves, without saying which,
//! that one commitment in the anonymity set opens to it. The serialized form
//! has a fixed layout of [`SPEND_PROOF_SIZE`] bytes.

use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use crate::coin::{derive_coin_with_version_number, ProtocolVersion, PublicCoin};
use crate::crypto::{
    scalar_from_bytes, scalar_to_bytes, GroupElement, MasterKey, ProtocolParams,
    ANONYMITY_SET_CAPACITY, ECDSA_PUBKEY_SIZE, ECDSA_SIGNATURE_SIZE, GROUP_ELEMENT_SIZE,
    SCALAR_SIZE,
};
use crate::denomination::Denomination;
use crate::encoding::{decode_hex, decode_hex_fixed, encode_hex, ByteReader, Hash256};
use crate::error::{SigmaError, SigmaResult};
use crate::zk::{ProofEngine, SigmaEngine, SigmaProof, SIGMA_PROOF_SIZE};

/// Serialized mint commitment
pub const COMMITMENT_SIZE: usize = GROUP_ELEMENT_SIZE;

/// Serialized serial number
pub const SERIAL_SIZE: usize = SCALAR_SIZE;

/// Serialized spend: header (48) + serial (32) + proof (1142) + pubkey (33) + signature (64)
pub const SPEND_PROOF_SIZE: usize = 8 + 4 + 4 + 32 + SERIAL_SIZE
    + SIGMA_PROOF_SIZE
    + ECDSA_PUBKEY_SIZE
    + ECDSA_SIGNATURE_SIZE;

/// Domain separator for the spend signature digest
const SIGNATURE_DOMAIN: &[u8] = b"sigma_spend_signature_v3";

// ============================================================================
// Anonymity Set
// ============================================================================

/// Public coins of one denomination among which a spend hides its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymitySet {
    denomination: Denomination,
    coins: Vec<PublicCoin>,
}

impl AnonymitySet {
    pub fn new(denomination: Denomination, coins: Vec<PublicCoin>) -> SigmaResult<Self> {
        check_set_size(coins.len())?;
        if let Some(index) = coins.iter().position(|c| c.denomination != denomination) {
            return Err(SigmaError::MalformedAnonymitySetEntry {
                index,
                reason: format!("denomination {} in a {denomination} set", coins[index].denomination),
            });
        }
        Ok(Self { denomination, coins })
    }

    /// Decode hex commitments as received from the host
    pub fn from_hex<S: AsRef<str>>(denomination: Denomination, entries: &[S]) -> SigmaResult<Self> {
        check_set_size(entries.len())?;
        let coins = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let bytes = decode_hex_fixed::<COMMITMENT_SIZE>(entry.as_ref())
                    .map_err(|e| SigmaError::MalformedAnonymitySetEntry {
                        index,
                        reason: e.to_string(),
                    })?;
                let value = GroupElement::from_bytes(&bytes).map_err(|e| {
                    SigmaError::MalformedAnonymitySetEntry {
                        index,
                        reason: e.to_string(),
                    }
                })?;
                Ok(PublicCoin::new(value, denomination))
            })
            .collect::<SigmaResult<Vec<_>>>()?;
        Ok(Self { denomination, coins })
    }

    pub fn denomination(&self) -> Denomination {
        self.denomination
    }

    pub fn coins(&self) -> &[PublicCoin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn position_of(&self, coin: &PublicCoin) -> Option<usize> {
        self.coins.iter().position(|c| c == coin)
    }

    /// `C_i - serial·g`; the spent coin becomes a commitment to zero
    pub(crate) fn shifted_commitments(
        &self,
        serial: &Scalar,
        params: &ProtocolParams,
    ) -> Vec<ProjectivePoint> {
        let offset = params.g * serial;
        self.coins.iter().map(|c| *c.value.point() - offset).collect()
    }
}

fn check_set_size(size: usize) -> SigmaResult<()> {
    if size == 0 || size > ANONYMITY_SET_CAPACITY {
        return Err(SigmaError::InvalidAnonymitySetSize {
            size,
            max: ANONYMITY_SET_CAPACITY,
        });
    }
    Ok(())
}

// ============================================================================
// Spend Metadata
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendMetadata {
    group_id: u32,
    block_hash: Hash256,
    tx_hash: Hash256,
}

impl SpendMetadata {
    pub fn new(group_id: u32, block_hash: Hash256, tx_hash: Hash256) -> SigmaResult<Self> {
        if group_id == 0 {
            return Err(SigmaError::InvalidSpendMetadata(
                "group id must be at least 1".into(),
            ));
        }
        Ok(Self {
            group_id,
            block_hash,
            tx_hash,
        })
    }

    pub fn from_hex(group_id: u32, block_hash: &str, tx_hash: &str) -> SigmaResult<Self> {
        let block_hash = Hash256::from_hex(block_hash)
            .map_err(|e| SigmaError::InvalidSpendMetadata(format!("block hash: {e}")))?;
        let tx_hash = Hash256::from_hex(tx_hash)
            .map_err(|e| SigmaError::InvalidSpendMetadata(format!("tx hash: {e}")))?;
        Self::new(group_id, block_hash, tx_hash)
    }

    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    pub fn block_hash(&self) -> &Hash256 {
        &self.block_hash
    }

    pub fn tx_hash(&self) -> &Hash256 {
        &self.tx_hash
    }
}

// ============================================================================
// Coin Spend
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSpend {
    denomination: Denomination,
    version: ProtocolVersion,
    group_id: u32,
    block_hash: Hash256,
    serial: Scalar,
    proof: SigmaProof,
    public_key: [u8; ECDSA_PUBKEY_SIZE],
    signature: [u8; ECDSA_SIGNATURE_SIZE],
}

impl CoinSpend {
    pub(crate) fn unsigned(
        denomination: Denomination,
        version: ProtocolVersion,
        metadata: &SpendMetadata,
        serial: Scalar,
        proof: SigmaProof,
        public_key: [u8; ECDSA_PUBKEY_SIZE],
    ) -> Self {
        Self {
            denomination,
            version,
            group_id: metadata.group_id(),
            block_hash: *metadata.block_hash(),
            serial,
            proof,
            public_key,
            signature: [0u8; ECDSA_SIGNATURE_SIZE],
        }
    }

    pub(crate) fn set_signature(&mut self, signature: [u8; ECDSA_SIGNATURE_SIZE]) {
        self.signature = signature;
    }

    pub fn denomination(&self) -> Denomination {
        self.denomination
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    pub fn block_hash(&self) -> &Hash256 {
        &self.block_hash
    }

    pub fn serial(&self) -> Scalar {
        self.serial
    }

    pub fn serial_bytes(&self) -> [u8; SERIAL_SIZE] {
        scalar_to_bytes(&self.serial)
    }

    pub fn proof(&self) -> &SigmaProof {
        &self.proof
    }

    pub fn public_key(&self) -> &[u8; ECDSA_PUBKEY_SIZE] {
        &self.public_key
    }

    pub fn signature(&self) -> &[u8; ECDSA_SIGNATURE_SIZE] {
        &self.signature
    }

    fn write_unsigned(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.denomination.value().to_le_bytes());
        out.extend_from_slice(&self.version.number().to_le_bytes());
        out.extend_from_slice(&self.group_id.to_le_bytes());
        out.extend_from_slice(self.block_hash.as_bytes());
        out.extend_from_slice(&scalar_to_bytes(&self.serial));
        self.proof.write_to(out);
        out.extend_from_slice(&self.public_key);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SPEND_PROOF_SIZE);
        self.write_unsigned(&mut out);
        out.extend_from_slice(&self.signature);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> SigmaResult<Self> {
        if bytes.len() != SPEND_PROOF_SIZE {
            return Err(SigmaError::MalformedProof(format!(
                "expected {SPEND_PROOF_SIZE} bytes, got {}",
                bytes.len()
            )));
        }

        let mut reader = ByteReader::new(bytes);
        let denomination = Denomination::from_value(reader.read_i64_le()?)
            .map_err(|e| SigmaError::MalformedProof(e.to_string()))?;
        let version = ProtocolVersion::try_from(reader.read_u32_le()?)
            .map_err(|e| SigmaError::MalformedProof(e.to_string()))?;
        let group_id = reader.read_u32_le()?;
        let block_hash = Hash256::from_bytes(reader.take::<32>()?);
        let serial = scalar_from_bytes(&reader.take::<SERIAL_SIZE>()?)
            .map_err(|e| SigmaError::MalformedProof(e.to_string()))?;
        let proof = SigmaProof::read_from(&mut reader, ProtocolParams::get())?;
        let public_key = reader.take::<ECDSA_PUBKEY_SIZE>()?;
        let signature = reader.take::<ECDSA_SIGNATURE_SIZE>()?;
        reader.finish()?;

        Ok(Self {
            denomination,
            version,
            group_id,
            block_hash,
            serial,
            proof,
            public_key,
            signature,
        })
    }

    /// SHA-256d over the domain, the transaction hash and every field but the signature
    pub fn signature_hash(&self, tx_hash: &Hash256) -> [u8; 32] {
        let mut unsigned = Vec::with_capacity(SPEND_PROOF_SIZE - ECDSA_SIGNATURE_SIZE);
        self.write_unsigned(&mut unsigned);

        let mut hasher = Sha256::new();
        hasher.update(SIGNATURE_DOMAIN);
        hasher.update(tx_hash.as_bytes());
        hasher.update(&unsigned);
        let inner = hasher.finalize();

        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(inner));
        out
    }
}

// ============================================================================
// Serialized Spend
// ============================================================================

/// A verified, serialized spend
#[derive(Clone, PartialEq, Eq)]
pub struct SpendProofBytes(Vec<u8>);

impl SpendProofBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SpendProofBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SpendProofBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpendProofBytes({} bytes)", self.0.len())
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Build a verified spend of the coin at `index`.
///
/// The proof is checked against the same set and metadata before it is
/// returned; a proof that does not verify is never handed out.
#[allow(clippy::too_many_arguments)]
pub fn create_spend_proof<S: AsRef<str>>(
    denomination: Denomination,
    master: &MasterKey,
    index: u32,
    anonymity_set: &[S],
    group_id: u32,
    block_hash: &str,
    tx_hash: &str,
    version: u32,
) -> SigmaResult<SpendProofBytes> {
    create_spend_proof_with(
        &SigmaEngine::new(),
        denomination,
        master,
        index,
        anonymity_set,
        group_id,
        block_hash,
        tx_hash,
        version,
    )
}

#[allow(clippy::too_many_arguments)]
#[instrument(
    skip(engine, master, anonymity_set, block_hash, tx_hash),
    fields(set_size = anonymity_set.len())
)]
pub fn create_spend_proof_with<E: ProofEngine, S: AsRef<str>>(
    engine: &E,
    denomination: Denomination,
    master: &MasterKey,
    index: u32,
    anonymity_set: &[S],
    group_id: u32,
    block_hash: &str,
    tx_hash: &str,
    version: u32,
) -> SigmaResult<SpendProofBytes> {
    let coin = derive_coin_with_version_number(denomination, master, index, version)?;
    let set = AnonymitySet::from_hex(denomination, anonymity_set)?;
    let metadata = SpendMetadata::from_hex(group_id, block_hash, tx_hash)?;

    let spend = engine.prove(&coin, &set, &metadata, true)?;
    if !engine.verify(&spend, &set, &metadata, true) {
        warn!("freshly built spend failed self-verification");
        return Err(SigmaError::ProofVerificationFailed);
    }

    let bytes = spend.to_bytes();
    if bytes.len() != SPEND_PROOF_SIZE {
        return Err(SigmaError::SerializationError(format!(
            "spend serialized to {} bytes",
            bytes.len()
        )));
    }
    debug!("spend proof created");
    Ok(SpendProofBytes(bytes))
}

/// Check a serialized spend against a set and metadata.
///
/// Malformed inputs are errors; a well-formed spend that does not verify is `Ok(false)`.
pub fn verify_spend_proof<S: AsRef<str>>(
    proof: &[u8],
    denomination: Denomination,
    anonymity_set: &[S],
    group_id: u32,
    block_hash: &str,
    tx_hash: &str,
) -> SigmaResult<bool> {
    verify_spend_proof_with(
        &SigmaEngine::new(),
        proof,
        denomination,
        anonymity_set,
        group_id,
        block_hash,
        tx_hash,
    )
}

#[instrument(
    skip(engine, proof, anonymity_set, block_hash, tx_hash),
    fields(set_size = anonymity_set.len())
)]
pub fn verify_spend_proof_with<E: ProofEngine, S: AsRef<str>>(
    engine: &E,
    proof: &[u8],
    denomination: Denomination,
    anonymity_set: &[S],
    group_id: u32,
    block_hash: &str,
    tx_hash: &str,
) -> SigmaResult<bool> {
    let spend = CoinSpend::from_bytes(proof)?;
    let set = AnonymitySet::from_hex(denomination, anonymity_set)?;
    let metadata = SpendMetadata::from_hex(group_id, block_hash, tx_hash)?;

    let valid = engine.verify(&spend, &set, &metadata, true);
    debug!(valid, "spend proof checked");
    Ok(valid)
}

/// Hex form of a serialized spend, as carried across the text boundary
pub fn verify_spend_proof_hex<S: AsRef<str>>(
    proof_hex: &str,
    denomination: Denomination,
    anonymity_set: &[S],
    group_id: u32,
    block_hash: &str,
    tx_hash: &str,
) -> SigmaResult<bool> {
    let proof = decode_hex(proof_hex.trim())?;
    verify_spend_proof(&proof, denomination, anonymity_set, group_id, block_hash, tx_hash)
}
