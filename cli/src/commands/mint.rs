//! Derive a coin and print its mint commitment

use anyhow::Result;
use colored::Colorize;
use sigma::{derive_coin, encode_hex, issue_commitment, mint_script, Denomination, MasterKey, ProtocolVersion};

pub fn run(denomination: Denomination, master: &MasterKey, index: u32, version: ProtocolVersion) -> Result<()> {
    let coin = derive_coin(denomination, master, index, version)?;
    let commitment = issue_commitment(&coin)?;

    println!();
    println!("{}", "Sigma Mint".yellow().bold());
    println!();
    println!("  Denomination: {}", denomination.to_string().cyan());
    println!("  Index:        {}", index);
    println!("  Version:      {}", version);
    println!();
    println!("{}:", "Commitment".cyan());
    println!("  {}", encode_hex(&commitment));
    println!("{}:", "Serial".cyan());
    println!("  {}", encode_hex(&coin.serial_bytes()));
    println!("{}:", "Output script".cyan());
    println!("  {}", encode_hex(&mint_script(&commitment)));
    println!();

    Ok(())
}
