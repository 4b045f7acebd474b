//! Command implementations and shared argument parsing

pub mod config;
pub mod info;
pub mod mint;
pub mod mint_value;
pub mod serial;
pub mod spend;
pub mod verify;

use std::fs;

use anyhow::{bail, Context, Result};
use sigma::{Denomination, MasterKey, COIN};
use zeroize::Zeroize;

/// Parse the master key, accepting surrounding whitespace
pub fn parse_master_key(text: &str) -> Result<MasterKey> {
    let mut owned = text.trim().to_string();
    let key = MasterKey::from_hex(&owned).context("Master key must be 64 hex characters");
    owned.zeroize();
    key
}

pub fn parse_denomination(text: &str) -> Result<Denomination> {
    text.parse::<Denomination>().with_context(|| {
        let supported: Vec<&str> = Denomination::ALL.iter().map(|d| d.as_str()).collect();
        format!("Supported denominations: {}", supported.join(", "))
    })
}

/// Parse a decimal coin amount (e.g. `126.65`) into base units without going through floats
pub fn parse_amount(text: &str) -> Result<i64> {
    let text = text.trim();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        bail!("Empty amount");
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        bail!("Amount must be a non-negative decimal number: {text}");
    }
    if fraction.len() > 8 {
        bail!("Amount has more than 8 decimal places: {text}");
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().context("Amount too large")? };
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<8}").parse().context("Invalid fractional part")?
    };

    whole
        .checked_mul(COIN)
        .and_then(|w| w.checked_add(fraction))
        .context("Amount too large")
}

/// Format base units as a coin amount
pub fn format_amount(base_units: i64) -> String {
    let whole = base_units / COIN;
    let fraction = (base_units % COIN).abs();
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:08}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

/// Anonymity set entries: comma separated hex, or `@path` to a file with one entry per line
pub fn read_anonymity_set(arg: &str) -> Result<Vec<String>> {
    let text = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read anonymity set from {path}"))?,
        None => arg.to_string(),
    };

    let entries: Vec<String> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_lowercase)
        .collect();

    if entries.is_empty() {
        bail!("Anonymity set is empty");
    }
    Ok(entries)
}
