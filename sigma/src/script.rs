//! Transaction script wrappers for mint outputs and spend inputs

use crate::crypto::GroupElement;
use crate::error::{SigmaError, SigmaResult};
use crate::spend::{SpendProofBytes, COMMITMENT_SIZE};

/// Marks an output script carrying a coin commitment
pub const OP_SIGMAMINT: u8 = 0xc3;

/// Marks an input script carrying a serialized spend
pub const OP_SIGMASPEND: u8 = 0xc4;

pub fn mint_script(commitment: &[u8; COMMITMENT_SIZE]) -> Vec<u8> {
    let mut script = Vec::with_capacity(1 + COMMITMENT_SIZE);
    script.push(OP_SIGMAMINT);
    script.extend_from_slice(commitment);
    script
}

pub fn spend_script(proof: &SpendProofBytes) -> Vec<u8> {
    let mut script = Vec::with_capacity(1 + proof.len());
    script.push(OP_SIGMASPEND);
    script.extend_from_slice(proof.as_bytes());
    script
}

pub fn is_mint_script(script: &[u8]) -> bool {
    script.len() == 1 + COMMITMENT_SIZE && script[0] == OP_SIGMAMINT
}

pub fn is_spend_script(script: &[u8]) -> bool {
    script.first() == Some(&OP_SIGMASPEND)
}

/// Commitment carried by a mint output script
pub fn commitment_from_mint_script(script: &[u8]) -> SigmaResult<GroupElement> {
    if !is_mint_script(script) {
        return Err(SigmaError::SerializationError("not a sigma mint script".into()));
    }
    GroupElement::from_slice(&script[1..])
}
