//! Bit-matrix proof
//!
//! Proves that a committed `m x n` matrix has entries in {0, 1} with exactly
//! one 1 per row, i.e. that it encodes the base-`n` digits of a secret index.
//!
//! Commitments use `Com(v; r) = r·g + Σ v_k·h_k`.

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};

use crate::crypto::{GroupElement, ProtocolParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct R1Proof {
    pub a: GroupElement,
    pub c: GroupElement,
    pub d: GroupElement,
    /// Responses for columns 1..n of every row; column 0 is implied
    pub f: Vec<Scalar>,
    pub z_a: Scalar,
    pub z_c: Scalar,
}

/// Vector commitment over the `h` bases, blinded by `g`
pub(crate) fn vector_commit(
    params: &ProtocolParams,
    values: &[Scalar],
    blinding: &Scalar,
) -> ProjectivePoint {
    values
        .iter()
        .zip(params.h.iter())
        .fold(params.g * blinding, |acc, (value, base)| acc + base * value)
}

/// First move of the bit-matrix proof, kept until the challenge is known
pub(crate) struct R1Prover<'a> {
    params: &'a ProtocolParams,
    bits: Vec<Scalar>,
    r_b: Scalar,
    a: Vec<Scalar>,
    r_a: Scalar,
    r_c: Scalar,
    r_d: Scalar,
    pub(crate) commit_a: GroupElement,
    pub(crate) commit_c: GroupElement,
    pub(crate) commit_d: GroupElement,
}

impl<'a> R1Prover<'a> {
    /// `bits` is the one-hot matrix already committed to as `B` with blinding `r_b`
    pub(crate) fn commit<R: RngCore + CryptoRng>(
        params: &'a ProtocolParams,
        bits: Vec<Scalar>,
        r_b: Scalar,
        rng: &mut R,
    ) -> Self {
        let (n, m) = (params.n, params.m);

        // Each row of `a` sums to zero so the implied column-0 response stays consistent
        let mut a = vec![Scalar::ZERO; n * m];
        for j in 0..m {
            let mut row_sum = Scalar::ZERO;
            for i in 1..n {
                let value = Scalar::random(&mut *rng);
                a[j * n + i] = value;
                row_sum += value;
            }
            a[j * n] = -row_sum;
        }

        let c: Vec<Scalar> = a
            .iter()
            .zip(bits.iter())
            .map(|(&a_k, &b_k)| a_k * (Scalar::ONE - (b_k + b_k)))
            .collect();
        let d: Vec<Scalar> = a.iter().map(|&a_k| -(a_k * a_k)).collect();

        let r_a = Scalar::random(&mut *rng);
        let r_c = Scalar::random(&mut *rng);
        let r_d = Scalar::random(&mut *rng);

        let commit_a = GroupElement::from_point(vector_commit(params, &a, &r_a));
        let commit_c = GroupElement::from_point(vector_commit(params, &c, &r_c));
        let commit_d = GroupElement::from_point(vector_commit(params, &d, &r_d));

        Self {
            params,
            bits,
            r_b,
            a,
            r_a,
            r_c,
            r_d,
            commit_a,
            commit_c,
            commit_d,
        }
    }

    /// Masking values, including the implied column 0
    pub(crate) fn a_values(&self) -> &[Scalar] {
        &self.a
    }

    pub(crate) fn respond(self, x: &Scalar) -> R1Proof {
        let (n, m) = (self.params.n, self.params.m);
        let mut f = Vec::with_capacity(m * (n - 1));
        for j in 0..m {
            for i in 1..n {
                let k = j * n + i;
                f.push(self.bits[k] * x + self.a[k]);
            }
        }

        R1Proof {
            a: self.commit_a,
            c: self.commit_c,
            d: self.commit_d,
            f,
            z_a: self.r_b * x + self.r_a,
            z_c: self.r_c * x + self.r_d,
        }
    }
}

/// Check the proof against the matrix commitment `b`.
///
/// On success returns the full response matrix (column 0 reconstructed),
/// which the one-of-many layer needs.
pub(crate) fn verify(
    params: &ProtocolParams,
    b: &GroupElement,
    proof: &R1Proof,
    x: &Scalar,
) -> Option<Vec<Scalar>> {
    let (n, m) = (params.n, params.m);
    if proof.f.len() != m * (n - 1) {
        return None;
    }

    let mut f = vec![Scalar::ZERO; n * m];
    for j in 0..m {
        let mut row_sum = Scalar::ZERO;
        for i in 1..n {
            let value = proof.f[j * (n - 1) + (i - 1)];
            f[j * n + i] = value;
            row_sum += value;
        }
        f[j * n] = *x - row_sum;
    }

    let left = vector_commit(params, &f, &proof.z_a);
    let right = *b.point() * x + proof.a.point();
    if left != right {
        return None;
    }

    let quadratic: Vec<Scalar> = f.iter().map(|&f_k| f_k * (*x - f_k)).collect();
    let left = vector_commit(params, &quadratic, &proof.z_c);
    let right = *proof.c.point() * x + proof.d.point();
    if left != right {
        return None;
    }

    Some(f)
}
