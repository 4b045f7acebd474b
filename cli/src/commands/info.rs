//! Show protocol parameters and configuration

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use sigma::{
    encode_hex, Denomination, GroupElement, ProtocolParams, ANONYMITY_SET_CAPACITY,
    COMMITMENT_SIZE, SERIAL_SIZE, SPEND_PROOF_SIZE,
};

use crate::config::{config_file, SigmaConfig};

pub fn run(config: &SigmaConfig, config_path: Option<&Path>) -> Result<()> {
    let params = ProtocolParams::get();

    println!();
    println!("{}", "Sigma Configuration".yellow().bold());
    println!();

    println!("{}:", "Config File".cyan());
    let path = config_file(config_path)?;
    if path.exists() {
        println!("  {}", path.display());
    } else {
        println!("  {} {}", path.display(), "(not created, using defaults)".dimmed());
    }
    println!("  Protocol version: {}", config.protocol_version);
    println!("  Log filter:       {}", config.log_filter);
    println!();

    println!("{}:", "Proof Parameters".cyan());
    println!("  n = {}, m = {}", params.n, params.m);
    println!("  Anonymity set capacity: {}", ANONYMITY_SET_CAPACITY);
    println!();

    println!("{}:", "Encoded Sizes".cyan());
    println!("  Commitment:  {} bytes", COMMITMENT_SIZE);
    println!("  Serial:      {} bytes", SERIAL_SIZE);
    println!("  Spend proof: {} bytes", SPEND_PROOF_SIZE);
    println!();

    println!("{}:", "Generators".cyan());
    println!("  g:  {}", encode_hex(&GroupElement::from_point(params.g).to_bytes()));
    println!("  h0: {}", encode_hex(&GroupElement::from_point(*params.h0()).to_bytes()));
    println!();

    println!("{}:", "Denominations".cyan());
    let names: Vec<&str> = Denomination::ALL.iter().map(|d| d.as_str()).collect();
    println!("  {}", names.join(", "));
    println!();

    Ok(())
}
