//! Group arithmetic, protocol parameters and key schedule

pub mod group;
pub mod keys;
pub mod params;

pub use group::*;
pub use keys::{
    serial_from_public_key, MasterKey, SecretScalar, ECDSA_PUBKEY_SIZE, ECDSA_SIGNATURE_SIZE,
    MASTER_KEY_SIZE,
};
pub use params::*;
