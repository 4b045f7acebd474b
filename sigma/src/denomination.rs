//! Coin face values
//!
//! Sigma coins come in a closed set of denominations. Each denomination has its
//! own anonymity sets, so a spend only hides among coins of the same value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SigmaError, SigmaResult};

/// Base units per whole coin
pub const COIN: i64 = 100_000_000;

pub const DENOMINATION_0_05: i64 = 5 * COIN / 100;
pub const DENOMINATION_0_1: i64 = COIN / 10;
pub const DENOMINATION_0_5: i64 = COIN / 2;
pub const DENOMINATION_1: i64 = COIN;
pub const DENOMINATION_10: i64 = 10 * COIN;
pub const DENOMINATION_25: i64 = 25 * COIN;
pub const DENOMINATION_100: i64 = 100 * COIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Denomination {
    #[serde(rename = "0.05")]
    D0_05,
    #[serde(rename = "0.1")]
    D0_1,
    #[serde(rename = "0.5")]
    D0_5,
    #[serde(rename = "1")]
    D1,
    #[serde(rename = "10")]
    D10,
    #[serde(rename = "25")]
    D25,
    #[serde(rename = "100")]
    D100,
}

impl Denomination {
    /// All denominations, smallest first
    pub const ALL: [Denomination; 7] = [
        Denomination::D0_05,
        Denomination::D0_1,
        Denomination::D0_5,
        Denomination::D1,
        Denomination::D10,
        Denomination::D25,
        Denomination::D100,
    ];

    /// Face value in base units
    pub fn value(self) -> i64 {
        match self {
            Denomination::D0_05 => DENOMINATION_0_05,
            Denomination::D0_1 => DENOMINATION_0_1,
            Denomination::D0_5 => DENOMINATION_0_5,
            Denomination::D1 => DENOMINATION_1,
            Denomination::D10 => DENOMINATION_10,
            Denomination::D25 => DENOMINATION_25,
            Denomination::D100 => DENOMINATION_100,
        }
    }

    pub fn from_value(value: i64) -> SigmaResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.value() == value)
            .ok_or_else(|| SigmaError::UnsupportedDenomination(format!("{value} base units")))
    }

    /// Face value in whole coins, as written in wallets and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Denomination::D0_05 => "0.05",
            Denomination::D0_1 => "0.1",
            Denomination::D0_5 => "0.5",
            Denomination::D1 => "1",
            Denomination::D10 => "10",
            Denomination::D25 => "25",
            Denomination::D100 => "100",
        }
    }
}

impl FromStr for Denomination {
    type Err = SigmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == trimmed)
            .ok_or_else(|| SigmaError::UnsupportedDenomination(trimmed.to_string()))
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Greedy split of `amount` (base units) into denominations, largest first.
///
/// Returns the coins to mint and whatever is left below the smallest
/// denomination.
pub fn split_amount(amount: i64) -> (Vec<Denomination>, i64) {
    let mut remaining = amount.max(0);
    let mut coins = Vec::new();
    for denomination in Denomination::ALL.iter().rev() {
        while remaining >= denomination.value() {
            remaining -= denomination.value();
            coins.push(*denomination);
        }
    }
    (coins, remaining)
}
