//! Sigma coins: deterministic derivation, minting and zero-knowledge spends
//!
//! A wallet derives a private coin from its master key and a coin index,
//! publishes the coin's commitment, and later spends it by revealing the serial
//! number together with a proof that one commitment in a public anonymity set
//! belongs to that serial, without saying which one.
//!
//! Every byte string crossing the crate boundary has a fixed size:
//! commitments are 34 bytes, serial numbers 32 and spend proofs 1319.

#![allow(clippy::op_ref)]

pub mod coin;
pub mod crypto;
pub mod denomination;
pub mod encoding;
pub mod error;
pub mod mint;
pub mod script;
pub mod serial;
pub mod spend;
pub mod zk;

#[cfg(test)]
mod tests;

#[cfg(test)]
mod test_vectors;


pub use coin::{derive_coin, derive_coin_with_version_number, PrivateCoin, ProtocolVersion, PublicCoin};
pub use crypto::{GroupElement, MasterKey, ProtocolParams, ANONYMITY_SET_CAPACITY};
pub use denomination::{split_amount, Denomination, COIN};
pub use encoding::{decode_hex, encode_hex, Hash256};
pub use error::{SigmaError, SigmaResult};
pub use mint::{issue_commitment, mint_commitment, plan_mints, MintOutput, MintPlan};
pub use script::{mint_script, spend_script, OP_SIGMAMINT, OP_SIGMASPEND};
pub use serial::export_serial_number;
pub use spend::{
    create_spend_proof, create_spend_proof_with, verify_spend_proof, verify_spend_proof_hex,
    verify_spend_proof_with, AnonymitySet, CoinSpend, SpendMetadata, SpendProofBytes,
    COMMITMENT_SIZE, SERIAL_SIZE, SPEND_PROOF_SIZE,
};
pub use zk::{ProofEngine, SigmaEngine};
