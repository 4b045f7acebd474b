//! One-of-many proof over an anonymity set
//!
//! Given commitments `C'_0 .. C'_{L-1}`, proves knowledge of an index `l` and
//! a blinding `r` with `C'_l = r·h0`, without revealing `l`. Callers shift the
//! coin commitments by the revealed serial number so that the spent coin
//! becomes a commitment to zero.
//!
//! The index is written in base `n` with `m` digits; the digits are committed
//! as a one-hot matrix (`B`) and proven well formed by the bit-matrix proof.

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::crypto::{
    scalar_from_bytes, scalar_from_digest, scalar_to_bytes, GroupElement, ProtocolParams,
    GROUP_ELEMENT_SIZE, SCALAR_SIZE,
};
use crate::encoding::ByteReader;
use crate::error::{SigmaError, SigmaResult};
use crate::zk::r1::{self, vector_commit, R1Proof, R1Prover};

/// Serialized size for the fixed (n = 4, m = 7) parameters
pub const SIGMA_PROOF_SIZE: usize = 1142;

/// Domain separator for the Fiat-Shamir challenge
const CHALLENGE_DOMAIN: &[u8] = b"sigma_challenge_v3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigmaProof {
    pub b: GroupElement,
    pub r1: R1Proof,
    pub g_k: Vec<GroupElement>,
    pub z: Scalar,
}

impl SigmaProof {
    /// Layout: B, A, C, D, f[m(n-1)], zA, zC, G[m], z
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.b.to_bytes());
        out.extend_from_slice(&self.r1.a.to_bytes());
        out.extend_from_slice(&self.r1.c.to_bytes());
        out.extend_from_slice(&self.r1.d.to_bytes());
        for f in &self.r1.f {
            out.extend_from_slice(&scalar_to_bytes(f));
        }
        out.extend_from_slice(&scalar_to_bytes(&self.r1.z_a));
        out.extend_from_slice(&scalar_to_bytes(&self.r1.z_c));
        for g in &self.g_k {
            out.extend_from_slice(&g.to_bytes());
        }
        out.extend_from_slice(&scalar_to_bytes(&self.z));
    }

    pub(crate) fn read_from(reader: &mut ByteReader<'_>, params: &ProtocolParams) -> SigmaResult<Self> {
        let b = read_element(reader)?;
        let a = read_element(reader)?;
        let c = read_element(reader)?;
        let d = read_element(reader)?;
        let f = (0..params.m * (params.n - 1))
            .map(|_| read_scalar(reader))
            .collect::<SigmaResult<Vec<_>>>()?;
        let z_a = read_scalar(reader)?;
        let z_c = read_scalar(reader)?;
        let g_k = (0..params.m)
            .map(|_| read_element(reader))
            .collect::<SigmaResult<Vec<_>>>()?;
        let z = read_scalar(reader)?;

        Ok(Self {
            b,
            r1: R1Proof { a, c, d, f, z_a, z_c },
            g_k,
            z,
        })
    }
}

fn read_element(reader: &mut ByteReader<'_>) -> SigmaResult<GroupElement> {
    let bytes = reader.take::<GROUP_ELEMENT_SIZE>()?;
    GroupElement::from_bytes(&bytes).map_err(|e| SigmaError::MalformedProof(e.to_string()))
}

fn read_scalar(reader: &mut ByteReader<'_>) -> SigmaResult<Scalar> {
    let bytes = reader.take::<SCALAR_SIZE>()?;
    scalar_from_bytes(&bytes).map_err(|e| SigmaError::MalformedProof(e.to_string()))
}

// ============================================================================
// Prover
// ============================================================================

/// Prove that `commits[l] = r·h0`.
///
/// With `padding`, the set is treated as extended to `n^m` entries by
/// repeating its last element.
pub(crate) fn prove<R: RngCore + CryptoRng>(
    params: &ProtocolParams,
    commits: &[ProjectivePoint],
    l: usize,
    r: &Scalar,
    padding: bool,
    rng: &mut R,
) -> SigmaResult<SigmaProof> {
    let (n, m) = (params.n, params.m);
    let capacity = params.capacity();
    if commits.is_empty() || commits.len() > capacity {
        return Err(SigmaError::InvalidAnonymitySetSize {
            size: commits.len(),
            max: capacity,
        });
    }
    if l >= commits.len() {
        return Err(SigmaError::ProofVerificationFailed);
    }

    let l_digits = to_digits(l, n, m);
    let mut bits = vec![Scalar::ZERO; n * m];
    for (j, &digit) in l_digits.iter().enumerate() {
        bits[j * n + digit] = Scalar::ONE;
    }

    let r_b = Scalar::random(&mut *rng);
    let b = GroupElement::from_point(vector_commit(params, &bits, &r_b));
    let r1_prover = R1Prover::commit(params, bits, r_b, rng);

    // p_i(x) = Π_j (δ(l_j, i_j)·x + a_{j,i_j})
    let polynomials = index_polynomials(n, m, &l_digits, r1_prover.a_values());
    let slots = slot_count(commits.len(), capacity, padding);
    let mut weights = vec![vec![Scalar::ZERO; commits.len()]; m];
    for (i, poly) in polynomials.iter().take(slots).enumerate() {
        let t = i.min(commits.len() - 1);
        for (k, row) in weights.iter_mut().enumerate() {
            row[t] += poly[k];
        }
    }

    let rho: Vec<Scalar> = (0..m).map(|_| Scalar::random(&mut *rng)).collect();
    let g_k: Vec<GroupElement> = weights
        .iter()
        .zip(rho.iter())
        .map(|(row, rho_k)| {
            let sum = multi_scalar_mul(commits, row);
            GroupElement::from_point(sum + params.h0() * rho_k)
        })
        .collect();

    let x = challenge(
        commits,
        &b,
        &r1_prover.commit_a,
        &r1_prover.commit_c,
        &r1_prover.commit_d,
        &g_k,
    );
    let r1 = r1_prover.respond(&x);

    // z = r·x^m - Σ rho_k·x^k
    let powers = powers_of(&x, m);
    let masked = rho
        .iter()
        .zip(powers.iter())
        .fold(Scalar::ZERO, |acc, (rho_k, x_k)| acc + *rho_k * x_k);
    let z = *r * powers[m] - masked;

    Ok(SigmaProof { b, r1, g_k, z })
}

// ============================================================================
// Verifier
// ============================================================================

/// With `extended_checks`, proofs carrying the identity in any commitment slot
/// are rejected outright.
pub(crate) fn verify(
    params: &ProtocolParams,
    commits: &[ProjectivePoint],
    proof: &SigmaProof,
    padding: bool,
    extended_checks: bool,
) -> bool {
    let (n, m) = (params.n, params.m);
    let capacity = params.capacity();
    if commits.is_empty() || commits.len() > capacity || proof.g_k.len() != m {
        return false;
    }

    if extended_checks {
        let mut elements = [&proof.b, &proof.r1.a, &proof.r1.c, &proof.r1.d]
            .into_iter()
            .chain(proof.g_k.iter());
        if elements.any(|e| e.is_identity()) {
            return false;
        }
    }

    let x = challenge(commits, &proof.b, &proof.r1.a, &proof.r1.c, &proof.r1.d, &proof.g_k);
    let Some(f) = r1::verify(params, &proof.b, &proof.r1, &x) else {
        return false;
    };

    let products = index_products(&f, n, m);
    let slots = slot_count(commits.len(), capacity, padding);
    let mut weights = vec![Scalar::ZERO; commits.len()];
    for (i, product) in products.iter().take(slots).enumerate() {
        weights[i.min(commits.len() - 1)] += product;
    }

    let powers = powers_of(&x, m);
    let folded = proof
        .g_k
        .iter()
        .zip(powers.iter())
        .fold(ProjectivePoint::IDENTITY, |acc, (g, x_k)| acc + *g.point() * x_k);

    let left = multi_scalar_mul(commits, &weights) - folded;
    let right = *params.h0() * &proof.z;
    left == right
}

// ============================================================================
// Helpers
// ============================================================================

fn slot_count(set_len: usize, capacity: usize, padding: bool) -> usize {
    if padding {
        capacity
    } else {
        set_len
    }
}

/// Little-endian base-`n` digits
fn to_digits(mut value: usize, n: usize, m: usize) -> Vec<usize> {
    let mut digits = Vec::with_capacity(m);
    for _ in 0..m {
        digits.push(value % n);
        value /= n;
    }
    digits
}

/// `[1, x, x^2, .., x^m]`
fn powers_of(x: &Scalar, m: usize) -> Vec<Scalar> {
    let mut powers = Vec::with_capacity(m + 1);
    let mut current = Scalar::ONE;
    for _ in 0..=m {
        powers.push(current);
        current *= x;
    }
    powers
}

fn multi_scalar_mul(points: &[ProjectivePoint], scalars: &[Scalar]) -> ProjectivePoint {
    points
        .iter()
        .zip(scalars.iter())
        .fold(ProjectivePoint::IDENTITY, |acc, (point, scalar)| acc + point * scalar)
}

/// Coefficients of every index polynomial, indexed by set position.
///
/// Expanded digit by digit from the most significant one so prefixes are
/// shared between indices.
fn index_polynomials(n: usize, m: usize, l_digits: &[usize], a: &[Scalar]) -> Vec<Vec<Scalar>> {
    let mut polys: Vec<Vec<Scalar>> = vec![vec![Scalar::ONE]];
    for j in (0..m).rev() {
        let mut next = Vec::with_capacity(polys.len() * n);
        for poly in &polys {
            for digit in 0..n {
                next.push(mul_linear(poly, l_digits[j] == digit, a[j * n + digit]));
            }
        }
        polys = next;
    }
    polys
}

/// `poly · (x + constant)` when `leading`, else `poly · constant`
fn mul_linear(poly: &[Scalar], leading: bool, constant: Scalar) -> Vec<Scalar> {
    let mut out = vec![Scalar::ZERO; poly.len() + 1];
    for (k, coeff) in poly.iter().enumerate() {
        out[k] += *coeff * constant;
        if leading {
            out[k + 1] += coeff;
        }
    }
    out
}

/// `Π_j f_{j, i_j}` for every index, in the same order as `index_polynomials`
fn index_products(f: &[Scalar], n: usize, m: usize) -> Vec<Scalar> {
    let mut products = vec![Scalar::ONE];
    for j in (0..m).rev() {
        let mut next = Vec::with_capacity(products.len() * n);
        for product in &products {
            for digit in 0..n {
                next.push(*product * f[j * n + digit]);
            }
        }
        products = next;
    }
    products
}

fn challenge(
    commits: &[ProjectivePoint],
    b: &GroupElement,
    a: &GroupElement,
    c: &GroupElement,
    d: &GroupElement,
    g_k: &[GroupElement],
) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(CHALLENGE_DOMAIN);
    for commit in commits {
        hasher.update(GroupElement::from_point(*commit).to_bytes());
    }
    for element in [b, a, c, d].into_iter().chain(g_k.iter()) {
        hasher.update(element.to_bytes());
    }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    scalar_from_digest(&digest)
}
