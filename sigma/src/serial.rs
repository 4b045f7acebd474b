//! Serial number export
//!
//! The ledger indexes spent serials to reject double spends; a wallet exports
//! a coin's serial to check whether that coin has already been spent.

use tracing::instrument;

use crate::coin::{derive_coin, ProtocolVersion};
use crate::crypto::MasterKey;
use crate::denomination::Denomination;
use crate::error::SigmaResult;
use crate::spend::SERIAL_SIZE;

/// Serial number of the coin at `index`, big-endian.
///
/// Both protocol versions share a key schedule, so the default one is used.
#[instrument(skip(master))]
pub fn export_serial_number(
    denomination: Denomination,
    master: &MasterKey,
    index: u32,
) -> SigmaResult<[u8; SERIAL_SIZE]> {
    let coin = derive_coin(denomination, master, index, ProtocolVersion::default())?;
    Ok(coin.serial_bytes())
}
