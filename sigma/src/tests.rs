//! Scenario tests for the mint/spend flow
//!
//! Tests cover:
//! - Mint then spend with a single-coin anonymity set
//! - Spends hidden among decoys, for both protocol versions
//! - Rejection of spends checked against the wrong set or metadata
//! - Tampering with serialized spends
//! - Refusal to return a spend that fails self-verification

#[cfg(test)]
mod spend_flow_tests {
    use crate::coin::{derive_coin, ProtocolVersion};
    use crate::crypto::MasterKey;
    use crate::denomination::Denomination;
    use crate::encoding::{decode_hex, encode_hex};
    use crate::error::SigmaError;
    use crate::mint::issue_commitment;
    use crate::serial::export_serial_number;
    use crate::spend::{
        create_spend_proof, verify_spend_proof, verify_spend_proof_hex, CoinSpend,
        SPEND_PROOF_SIZE,
    };

    const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    fn test_key() -> MasterKey {
        MasterKey::from_hex("0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20")
            .expect("valid test key")
    }

    fn other_key() -> MasterKey {
        MasterKey::from_bytes(&[0xee; 32]).unwrap()
    }

    fn commitment_hex(master: &MasterKey, denomination: Denomination, index: u32) -> String {
        let coin = derive_coin(denomination, master, index, ProtocolVersion::V3_1).unwrap();
        encode_hex(&issue_commitment(&coin).unwrap())
    }

    fn tx_hash(byte: u8) -> String {
        format!("{byte:02x}").repeat(32)
    }

    #[test]
    fn test_single_coin_mint_and_spend() {
        let key = test_key();
        let coin = derive_coin(Denomination::D1, &key, 0, ProtocolVersion::V3_1).unwrap();
        let commitment = issue_commitment(&coin).unwrap();
        assert_eq!(commitment.len(), 34);

        let set = vec![encode_hex(&commitment)];
        let proof = create_spend_proof(Denomination::D1, &key, 0, &set, 1, ZERO_HASH, ZERO_HASH, 31)
            .expect("spend of own coin must succeed");
        assert_eq!(proof.len(), SPEND_PROOF_SIZE);

        let valid =
            verify_spend_proof(proof.as_bytes(), Denomination::D1, &set, 1, ZERO_HASH, ZERO_HASH)
                .unwrap();
        assert!(valid);

        let mut tampered = commitment;
        tampered[5] ^= 0x01;
        let tampered_set = vec![encode_hex(&tampered)];
        let err = create_spend_proof(
            Denomination::D1,
            &key,
            0,
            &tampered_set,
            1,
            ZERO_HASH,
            ZERO_HASH,
            31,
        )
        .unwrap_err();
        assert!(
            matches!(
                err,
                SigmaError::MalformedAnonymitySetEntry { index: 0, .. }
                    | SigmaError::ProofVerificationFailed
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_spend_hidden_among_decoys() {
        let key = test_key();
        let decoys = other_key();
        let mut set: Vec<String> = (0..6)
            .map(|i| commitment_hex(&decoys, Denomination::D10, i))
            .collect();
        set.insert(3, commitment_hex(&key, Denomination::D10, 42));

        for version in [30, 31] {
            let proof = create_spend_proof(
                Denomination::D10,
                &key,
                42,
                &set,
                7,
                &tx_hash(0xab),
                &tx_hash(0xcd),
                version,
            )
            .unwrap();

            let spend = CoinSpend::from_bytes(proof.as_bytes()).unwrap();
            assert_eq!(spend.version().number(), version);
            assert_eq!(spend.group_id(), 7);
            assert_eq!(
                spend.serial_bytes(),
                export_serial_number(Denomination::D10, &key, 42).unwrap()
            );

            assert!(verify_spend_proof(
                proof.as_bytes(),
                Denomination::D10,
                &set,
                7,
                &tx_hash(0xab),
                &tx_hash(0xcd)
            )
            .unwrap());
        }
    }

    #[test]
    fn test_absent_coin_is_verification_failure() {
        let key = test_key();
        let set: Vec<String> = (0..3)
            .map(|i| commitment_hex(&other_key(), Denomination::D1, i))
            .collect();

        let err = create_spend_proof(Denomination::D1, &key, 0, &set, 1, ZERO_HASH, ZERO_HASH, 31)
            .unwrap_err();
        assert_eq!(err, SigmaError::ProofVerificationFailed);
    }

    #[test]
    fn test_spend_bound_to_denomination() {
        let key = test_key();
        assert_ne!(
            export_serial_number(Denomination::D1, &key, 0).unwrap(),
            export_serial_number(Denomination::D100, &key, 0).unwrap()
        );

        // A one-coin commitment cannot be spent as a hundred-coin coin
        let set = vec![commitment_hex(&key, Denomination::D1, 0)];
        let err = create_spend_proof(Denomination::D100, &key, 0, &set, 1, ZERO_HASH, ZERO_HASH, 31)
            .unwrap_err();
        assert_eq!(err, SigmaError::ProofVerificationFailed);

        let proof = create_spend_proof(Denomination::D1, &key, 0, &set, 1, ZERO_HASH, ZERO_HASH, 31)
            .unwrap();
        assert!(verify_spend_proof(proof.as_bytes(), Denomination::D1, &set, 1, ZERO_HASH, ZERO_HASH)
            .unwrap());
        assert!(!verify_spend_proof(proof.as_bytes(), Denomination::D100, &set, 1, ZERO_HASH, ZERO_HASH)
            .unwrap());
    }

    #[test]
    fn test_metadata_is_bound() {
        let key = test_key();
        let set = vec![
            commitment_hex(&other_key(), Denomination::D25, 0),
            commitment_hex(&key, Denomination::D25, 1),
        ];
        let proof =
            create_spend_proof(Denomination::D25, &key, 1, &set, 2, &tx_hash(1), &tx_hash(2), 31)
                .unwrap();
        let bytes = proof.as_bytes();

        assert!(verify_spend_proof(bytes, Denomination::D25, &set, 2, &tx_hash(1), &tx_hash(2)).unwrap());
        assert!(!verify_spend_proof(bytes, Denomination::D25, &set, 3, &tx_hash(1), &tx_hash(2)).unwrap());
        assert!(!verify_spend_proof(bytes, Denomination::D25, &set, 2, &tx_hash(9), &tx_hash(2)).unwrap());
        assert!(!verify_spend_proof(bytes, Denomination::D25, &set, 2, &tx_hash(1), &tx_hash(9)).unwrap());
    }

    #[test]
    fn test_verification_depends_on_whole_set() {
        let key = test_key();
        let mut set = vec![
            commitment_hex(&key, Denomination::D100, 5),
            commitment_hex(&other_key(), Denomination::D100, 0),
        ];
        let proof =
            create_spend_proof(Denomination::D100, &key, 5, &set, 1, ZERO_HASH, ZERO_HASH, 30)
                .unwrap();

        set[1] = commitment_hex(&other_key(), Denomination::D100, 1);
        assert!(!verify_spend_proof(proof.as_bytes(), Denomination::D100, &set, 1, ZERO_HASH, ZERO_HASH)
            .unwrap());
    }

    #[test]
    fn test_tampered_spend_bytes_rejected() {
        let key = test_key();
        let set = vec![commitment_hex(&key, Denomination::D0_1, 3)];
        let proof =
            create_spend_proof(Denomination::D0_1, &key, 3, &set, 1, ZERO_HASH, ZERO_HASH, 31)
                .unwrap();

        // Flip a bit in a response scalar inside the sigma proof body
        let mut bytes = proof.into_vec();
        let offset = 8 + 4 + 4 + 32 + 32 + 4 * 34 + 5;
        bytes[offset] ^= 0x01;
        match verify_spend_proof(&bytes, Denomination::D0_1, &set, 1, ZERO_HASH, ZERO_HASH) {
            Ok(valid) => assert!(!valid),
            Err(err) => assert!(matches!(err, SigmaError::MalformedProof(_))),
        }

        // Flip a bit in the signature
        let mut bytes = create_spend_proof(Denomination::D0_1, &key, 3, &set, 1, ZERO_HASH, ZERO_HASH, 31)
            .unwrap()
            .into_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        match verify_spend_proof(&bytes, Denomination::D0_1, &set, 1, ZERO_HASH, ZERO_HASH) {
            Ok(valid) => assert!(!valid),
            Err(err) => assert!(matches!(err, SigmaError::MalformedProof(_))),
        }
    }

    #[test]
    fn test_proofs_are_randomized() {
        let key = test_key();
        let set = vec![commitment_hex(&key, Denomination::D1, 0)];
        let a = create_spend_proof(Denomination::D1, &key, 0, &set, 1, ZERO_HASH, ZERO_HASH, 31).unwrap();
        let b = create_spend_proof(Denomination::D1, &key, 0, &set, 1, ZERO_HASH, ZERO_HASH, 31).unwrap();
        assert_ne!(a, b);

        // The revealed serial is the same for both
        let a = CoinSpend::from_bytes(a.as_bytes()).unwrap();
        let b = CoinSpend::from_bytes(b.as_bytes()).unwrap();
        assert_eq!(a.serial_bytes(), b.serial_bytes());
    }

    #[test]
    fn test_hex_verification_path() {
        let key = test_key();
        let set = vec![commitment_hex(&key, Denomination::D0_05, 11)];
        let proof =
            create_spend_proof(Denomination::D0_05, &key, 11, &set, 1, ZERO_HASH, ZERO_HASH, 31)
                .unwrap();
        let text = proof.to_hex();
        assert_eq!(text.len(), 2 * SPEND_PROOF_SIZE);
        assert_eq!(decode_hex(&text).unwrap(), proof.as_bytes());

        assert!(verify_spend_proof_hex(&text, Denomination::D0_05, &set, 1, ZERO_HASH, ZERO_HASH).unwrap());
        assert!(matches!(
            verify_spend_proof_hex(&text[..100], Denomination::D0_05, &set, 1, ZERO_HASH, ZERO_HASH),
            Err(SigmaError::MalformedProof(_))
        ));
    }
}

#[cfg(test)]
mod input_validation_tests {
    use crate::crypto::MasterKey;
    use crate::denomination::Denomination;
    use crate::error::SigmaError;
    use crate::spend::create_spend_proof;

    const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    fn key() -> MasterKey {
        MasterKey::from_bytes(&[1u8; 32]).unwrap()
    }

    #[test]
    fn test_unsupported_version_rejected_first() {
        let set = vec!["zz".to_string()];
        let err = create_spend_proof(Denomination::D1, &key(), 0, &set, 1, ZERO_HASH, ZERO_HASH, 29)
            .unwrap_err();
        assert_eq!(err, SigmaError::UnsupportedProtocolVersion(29));
    }

    #[test]
    fn test_empty_set_rejected() {
        let set: Vec<String> = Vec::new();
        let err = create_spend_proof(Denomination::D1, &key(), 0, &set, 1, ZERO_HASH, ZERO_HASH, 31)
            .unwrap_err();
        assert!(matches!(err, SigmaError::InvalidAnonymitySetSize { size: 0, .. }));
    }

    #[test]
    fn test_group_zero_rejected() {
        let set = vec![format!("{}00", "00".repeat(32)) + "01"];
        let err = create_spend_proof(Denomination::D1, &key(), 0, &set, 0, ZERO_HASH, ZERO_HASH, 31)
            .unwrap_err();
        assert!(matches!(err, SigmaError::InvalidSpendMetadata(_)));
    }

    #[test]
    fn test_bad_block_hash_rejected() {
        let set = vec![format!("{}00", "00".repeat(32)) + "01"];
        let err = create_spend_proof(Denomination::D1, &key(), 0, &set, 1, "00", ZERO_HASH, 31)
            .unwrap_err();
        assert!(matches!(err, SigmaError::InvalidSpendMetadata(_)));
        assert!(err.is_input_error());
    }
}

#[cfg(test)]
mod self_check_tests {
    use std::cell::Cell;

    use crate::coin::{derive_coin, PrivateCoin, ProtocolVersion};
    use crate::crypto::MasterKey;
    use crate::denomination::Denomination;
    use crate::encoding::encode_hex;
    use crate::error::{SigmaError, SigmaResult};
    use crate::spend::{create_spend_proof_with, AnonymitySet, CoinSpend, SpendMetadata};
    use crate::zk::{ProofEngine, SigmaEngine};

    const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    /// Proves honestly, then reports every spend as invalid
    struct RejectingEngine {
        inner: SigmaEngine,
        verify_calls: Cell<usize>,
    }

    impl ProofEngine for RejectingEngine {
        fn prove(
            &self,
            coin: &PrivateCoin,
            set: &AnonymitySet,
            metadata: &SpendMetadata,
            extended_checks: bool,
        ) -> SigmaResult<CoinSpend> {
            self.inner.prove(coin, set, metadata, extended_checks)
        }

        fn verify(&self, _: &CoinSpend, _: &AnonymitySet, _: &SpendMetadata, _: bool) -> bool {
            self.verify_calls.set(self.verify_calls.get() + 1);
            false
        }
    }

    /// Delegates both steps and records what verification answered
    struct RecordingEngine {
        inner: SigmaEngine,
        verdicts: Cell<(usize, bool)>,
    }

    impl ProofEngine for RecordingEngine {
        fn prove(
            &self,
            coin: &PrivateCoin,
            set: &AnonymitySet,
            metadata: &SpendMetadata,
            extended_checks: bool,
        ) -> SigmaResult<CoinSpend> {
            self.inner.prove(coin, set, metadata, extended_checks)
        }

        fn verify(
            &self,
            spend: &CoinSpend,
            set: &AnonymitySet,
            metadata: &SpendMetadata,
            extended_checks: bool,
        ) -> bool {
            let valid = self.inner.verify(spend, set, metadata, extended_checks);
            let (calls, all_valid) = self.verdicts.get();
            self.verdicts.set((calls + 1, all_valid && valid));
            valid
        }
    }

    fn key() -> MasterKey {
        MasterKey::from_bytes(&[0x64; 32]).unwrap()
    }

    fn own_set() -> Vec<String> {
        let coin = derive_coin(Denomination::D1, &key(), 2, ProtocolVersion::V3_1).unwrap();
        vec![encode_hex(&coin.commitment().to_bytes())]
    }

    #[test]
    fn test_unverified_proof_is_never_returned() {
        let engine = RejectingEngine {
            inner: SigmaEngine::new(),
            verify_calls: Cell::new(0),
        };

        let result = create_spend_proof_with(
            &engine,
            Denomination::D1,
            &key(),
            2,
            &own_set(),
            1,
            ZERO_HASH,
            ZERO_HASH,
            31,
        );
        assert_eq!(result.unwrap_err(), SigmaError::ProofVerificationFailed);
        assert_eq!(engine.verify_calls.get(), 1);
    }

    #[test]
    fn test_success_implies_verified() {
        let engine = RecordingEngine {
            inner: SigmaEngine::new(),
            verdicts: Cell::new((0, true)),
        };

        let proof = create_spend_proof_with(
            &engine,
            Denomination::D1,
            &key(),
            2,
            &own_set(),
            1,
            ZERO_HASH,
            ZERO_HASH,
            30,
        )
        .unwrap();
        assert_eq!(engine.verdicts.get(), (1, true));
        assert_eq!(CoinSpend::from_bytes(proof.as_bytes()).unwrap().version(), ProtocolVersion::V3_0);
    }
}

#[cfg(test)]
mod thread_safety_tests {
    use crate::coin::{PrivateCoin, PublicCoin};
    use crate::crypto::{MasterKey, ProtocolParams};
    use crate::spend::{AnonymitySet, CoinSpend, SpendMetadata, SpendProofBytes};
    use crate::zk::SigmaEngine;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_public_types_are_send_sync() {
        assert_send_sync::<PrivateCoin>();
        assert_send_sync::<PublicCoin>();
        assert_send_sync::<MasterKey>();
        assert_send_sync::<SigmaEngine>();
        assert_send_sync::<ProtocolParams>();
        assert_send_sync::<AnonymitySet>();
        assert_send_sync::<SpendMetadata>();
        assert_send_sync::<CoinSpend>();
        assert_send_sync::<SpendProofBytes>();
    }
}
