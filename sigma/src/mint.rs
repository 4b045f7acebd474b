//! Mint issuance
//!
//! A mint publishes only the coin commitment. Wallets that mint an arbitrary
//! amount split it into denominations and spend one fresh index per coin.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::coin::{derive_coin, PrivateCoin, ProtocolVersion};
use crate::crypto::MasterKey;
use crate::denomination::{split_amount, Denomination};
use crate::encoding::encode_hex;
use crate::error::{SigmaError, SigmaResult};
use crate::spend::COMMITMENT_SIZE;

/// Canonical 34-byte commitment of a derived coin
pub fn issue_commitment(coin: &PrivateCoin) -> SigmaResult<[u8; COMMITMENT_SIZE]> {
    let commitment = coin.commitment();
    if commitment.is_identity() {
        return Err(SigmaError::SerializationError(
            "coin commitment is the point at infinity".into(),
        ));
    }
    Ok(commitment.to_bytes())
}

/// Derive the coin at `index` and return its commitment
pub fn mint_commitment(
    denomination: Denomination,
    master: &MasterKey,
    index: u32,
    version: ProtocolVersion,
) -> SigmaResult<[u8; COMMITMENT_SIZE]> {
    let coin = derive_coin(denomination, master, index, version)?;
    issue_commitment(&coin)
}

/// One coin of a mint plan, in text form for the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintOutput {
    pub denomination: Denomination,
    pub index: u32,
    pub commitment: String,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintPlan {
    pub mints: Vec<MintOutput>,
    /// Base units below the smallest denomination, left unminted
    pub remainder: i64,
}

impl MintPlan {
    /// Index of the last coin minted, if any
    pub fn last_index(&self) -> Option<u32> {
        self.mints.last().map(|m| m.index)
    }

    pub fn minted_value(&self) -> i64 {
        self.mints.iter().map(|m| m.denomination.value()).sum()
    }
}

/// Split `amount` (base units) into coins, largest denomination first.
///
/// `last_index` is the wallet's most recently used coin index; each coin takes
/// the next one.
#[instrument(skip(master))]
pub fn plan_mints(
    amount: i64,
    master: &MasterKey,
    last_index: u32,
    version: ProtocolVersion,
) -> SigmaResult<MintPlan> {
    let (denominations, remainder) = split_amount(amount);

    let mut index = last_index;
    let mut mints = Vec::with_capacity(denominations.len());
    for denomination in denominations {
        index = index
            .checked_add(1)
            .ok_or_else(|| SigmaError::Derivation("coin index space exhausted".into()))?;

        let coin = derive_coin(denomination, master, index, version)?;
        mints.push(MintOutput {
            denomination,
            index,
            commitment: encode_hex(&issue_commitment(&coin)?),
            serial: encode_hex(&coin.serial_bytes()),
        });
    }

    debug!(coins = mints.len(), remainder, "planned mints");
    Ok(MintPlan { mints, remainder })
}
