//! Build a verified spend proof

use anyhow::{Context, Result};
use colored::Colorize;
use sigma::{create_spend_proof, encode_hex, spend_script, Denomination, MasterKey, ProtocolVersion};

pub struct SpendOptions {
    pub denomination: Denomination,
    pub index: u32,
    pub anonymity_set: Vec<String>,
    pub group_id: u32,
    pub block_hash: String,
    pub tx_hash: String,
    pub version: ProtocolVersion,
    /// Print only the proof hex
    pub raw: bool,
}

pub fn run(master: &MasterKey, options: SpendOptions) -> Result<()> {
    if !options.raw {
        println!("{}", "Building spend proof...".cyan());
    }

    let proof = create_spend_proof(
        options.denomination,
        master,
        options.index,
        &options.anonymity_set,
        options.group_id,
        &options.block_hash,
        &options.tx_hash,
        options.version.number(),
    )
    .context("Failed to build spend proof")?;

    if options.raw {
        println!("{}", proof.to_hex());
        return Ok(());
    }

    println!();
    println!("{}", "Sigma Spend".yellow().bold());
    println!();
    println!("  Denomination:   {}", options.denomination.to_string().cyan());
    println!("  Anonymity set:  {} coin(s)", options.anonymity_set.len());
    println!("  Group:          {}", options.group_id);
    println!("  Version:        {}", options.version);
    println!("  Size:           {} bytes", proof.len());
    println!("  {}", "Self-verification: PASSED".green());
    println!();
    println!("{}:", "Proof".cyan());
    println!("{}", proof.to_hex());
    println!();
    println!("{}:", "Input script".cyan());
    println!("{}", encode_hex(&spend_script(&proof)));

    Ok(())
}
