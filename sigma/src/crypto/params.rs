//! Process-wide protocol parameters
//!
//! The generators are fixed constants of the protocol: every wallet and every
//! verifier must derive the same ones. They are computed once on first use and
//! never mutated afterwards.

use std::sync::OnceLock;

use k256::ProjectivePoint;
use sha2::{Digest, Sha256};

use crate::crypto::group::decompress;

/// Domain separator for nothing-up-my-sleeve generator derivation
const GENERATOR_DOMAIN: &[u8] = b"sigma_generator_v3";

/// Proof radix
pub const SIGMA_N: usize = 4;

/// Proof digit count
pub const SIGMA_M: usize = 7;

/// Largest anonymity set a single proof can cover (`SIGMA_N ^ SIGMA_M`)
pub const ANONYMITY_SET_CAPACITY: usize = 16_384;

static PARAMS: OnceLock<ProtocolParams> = OnceLock::new();

#[derive(Debug)]
pub struct ProtocolParams {
    /// Serial number base; also blinds the bit commitments
    pub g: ProjectivePoint,
    /// Vector commitment bases. `h[0]` is the coin randomness base.
    pub h: Vec<ProjectivePoint>,
    pub n: usize,
    pub m: usize,
}

impl ProtocolParams {
    /// Shared parameters, built on first call
    pub fn get() -> &'static ProtocolParams {
        PARAMS.get_or_init(Self::generate)
    }

    fn generate() -> Self {
        let g = hash_to_point(b"g", 0);
        let h = (0..SIGMA_N * SIGMA_M)
            .map(|i| hash_to_point(b"h", i as u32))
            .collect();
        Self {
            g,
            h,
            n: SIGMA_N,
            m: SIGMA_M,
        }
    }

    pub fn h0(&self) -> &ProjectivePoint {
        &self.h[0]
    }

    /// `n^m`
    pub fn capacity(&self) -> usize {
        self.n.pow(self.m as u32)
    }
}

/// Try-and-increment: hash to an x coordinate until it lands on the curve
fn hash_to_point(label: &[u8], index: u32) -> ProjectivePoint {
    let mut counter: u32 = 0;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(GENERATOR_DOMAIN);
        hasher.update(label);
        hasher.update(index.to_le_bytes());
        hasher.update(counter.to_le_bytes());
        let digest = hasher.finalize();

        let mut sec1 = [0u8; 33];
        sec1[0] = 0x02;
        sec1[1..].copy_from_slice(&digest);

        if let Some(point) = decompress(&sec1) {
            return ProjectivePoint::from(point);
        }
        counter += 1;
    }
}
