//! Fixed-input vectors for derivation and encoding
//!
//! Values pin the key schedule and the generator derivation: any change to a
//! domain separator, hash input order or point encoding breaks them, and with
//! it every coin already minted.

#[cfg(test)]
mod derivation_vectors {
    use crate::coin::{derive_coin, ProtocolVersion};
    use crate::crypto::keys::{expand_coin_secrets, spend_public_key};
    use crate::crypto::{GroupElement, MasterKey, ProtocolParams};
    use crate::denomination::Denomination;
    use crate::encoding::encode_hex;
    use crate::mint::issue_commitment;
    use crate::serial::export_serial_number;

    /// 0x01, 0x02, .., 0x20
    const KEY: &str = "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20";

    struct Vector {
        index: u32,
        public_key: &'static str,
        serial: &'static str,
        commitment: &'static str,
    }

    const VECTORS: [Vector; 3] = [
        Vector {
            index: 0,
            public_key: "023df47f0529bde58332a66a63c8522e441ab66653d9f76b2b3484dad283cfc7b2",
            serial: "a311455366b435b9b6500979b94157f4a6f941ba1efba6ea0719666a48edb17d",
            commitment: "367049b52a7c3bdd2e67a0fd155c3c16bad19c9fc31a92a460f6a4a5822e754e0000",
        },
        Vector {
            index: 1,
            public_key: "0384324047c2ae98ae49e33c0a292fdb8a15d795abbedc22b898c9a3b66bd53bda",
            serial: "50233903950485fe8e98f22dafcb0b77c3d12069891ab13605a3bfe65ff744a8",
            commitment: "5450ab57c0cc1a1171701143fe9e4f424a257145076d87bab772245329e9464b0100",
        },
        Vector {
            index: 7,
            public_key: "035bcfde9f7b05562489e502021e355b64c719eca6f29a6e02c93b271cd781ab93",
            serial: "3fdc7385a24775c99a01539dc82aaa91a9ca9b53ddbc1b13ff4ed8df0360c40a",
            commitment: "cf991b1d399ff2e1939a403e4589a8394426e7d343c31ebfa7d58327bf4502bc0100",
        },
    ];

    #[test]
    fn test_vector_generators() {
        let params = ProtocolParams::get();
        assert_eq!(
            encode_hex(&GroupElement::from_point(params.g).to_bytes()),
            "7700ef8d471771a7a75a374905ab2013bdd46274b631b3f79bcdd48571fbe60f0000"
        );
        assert_eq!(
            encode_hex(&GroupElement::from_point(*params.h0()).to_bytes()),
            "d43efbe6d6f5b679036abbbbc9a7dc3c85419c0e97e7f2a9510670619e67adb70000"
        );
    }

    #[test]
    fn test_vector_spend_keys() {
        let master = MasterKey::from_hex(KEY).unwrap();
        for vector in &VECTORS {
            let secrets = expand_coin_secrets(&master, Denomination::D1, vector.index).unwrap();
            assert_eq!(
                encode_hex(&spend_public_key(&secrets.spend_key)),
                vector.public_key,
                "public key at index {}",
                vector.index
            );
        }
    }

    #[test]
    fn test_vector_serials() {
        let master = MasterKey::from_hex(KEY).unwrap();
        for vector in &VECTORS {
            let serial = export_serial_number(Denomination::D1, &master, vector.index).unwrap();
            assert_eq!(encode_hex(&serial), vector.serial, "serial at index {}", vector.index);
        }
    }

    #[test]
    fn test_vector_commitments() {
        let master = MasterKey::from_hex(KEY).unwrap();
        for vector in &VECTORS {
            for version in [ProtocolVersion::V3_0, ProtocolVersion::V3_1] {
                let coin = derive_coin(Denomination::D1, &master, vector.index, version).unwrap();
                assert_eq!(
                    encode_hex(&issue_commitment(&coin).unwrap()),
                    vector.commitment,
                    "commitment at index {} for version {version}",
                    vector.index
                );
            }
        }
    }

    /// Odd-y commitment, so the parity byte is exercised
    #[test]
    fn test_vector_odd_parity_commitment() {
        let master = MasterKey::from_bytes(&[0x42; 32]).unwrap();
        let coin = derive_coin(Denomination::D100, &master, 1, ProtocolVersion::V3_1).unwrap();
        assert_eq!(
            encode_hex(&coin.serial_bytes()),
            "31e9509ad3616da70fb046c9e82796722fef3802e47e56ec2204cf8e3c700943"
        );
        assert_eq!(
            encode_hex(&coin.commitment().to_bytes()),
            "49bf5a0e8d5fd810e83f75ba94d10f897005b04f0d24a204307345abec55a45a0100"
        );
    }

    /// Same key and index as the first vector, one hundred coins instead of one
    #[test]
    fn test_vector_denomination_is_keyed() {
        let master = MasterKey::from_hex(KEY).unwrap();
        let coin = derive_coin(Denomination::D100, &master, 0, ProtocolVersion::V3_1).unwrap();
        assert_eq!(
            encode_hex(&coin.serial_bytes()),
            "5a16108a687125bd79fcd9626771b4c2fdfd339b31891cf456b175561454b194"
        );
        assert_eq!(
            encode_hex(&coin.commitment().to_bytes()),
            "d075daeef5b7593c3373efa65bfd42d5a2fd31f15ba8c9f54ea7d9dc0922f4250100"
        );
        assert_ne!(encode_hex(&coin.serial_bytes()), VECTORS[0].serial);
    }

    #[test]
    fn test_vector_secp256k1_generator_encoding() {
        let g = GroupElement::from_point(k256::ProjectivePoint::GENERATOR);
        assert_eq!(
            encode_hex(&g.to_bytes()),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f817980000"
        );
    }
}
