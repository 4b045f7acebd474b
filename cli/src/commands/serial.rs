//! Export a coin's serial number

use anyhow::Result;
use colored::Colorize;
use sigma::{encode_hex, export_serial_number, Denomination, MasterKey};

pub fn run(denomination: Denomination, master: &MasterKey, index: u32, raw: bool) -> Result<()> {
    let serial = encode_hex(&export_serial_number(denomination, master, index)?);

    if raw {
        println!("{serial}");
        return Ok(());
    }

    println!();
    println!("{}", "Sigma Serial Number".yellow().bold());
    println!();
    println!("  {}", serial);
    println!();
    println!(
        "{}",
        "If this serial appears on chain, the coin has already been spent.".dimmed()
    );

    Ok(())
}
