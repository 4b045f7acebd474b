//! Verify a serialized spend against an anonymity set

use anyhow::{bail, Result};
use colored::Colorize;
use sigma::{verify_spend_proof_hex, Denomination};

pub struct VerifyOptions {
    pub denomination: Denomination,
    pub proof: String,
    pub anonymity_set: Vec<String>,
    pub group_id: u32,
    pub block_hash: String,
    pub tx_hash: String,
}

pub fn run(options: VerifyOptions) -> Result<()> {
    let valid = verify_spend_proof_hex(
        &options.proof,
        options.denomination,
        &options.anonymity_set,
        options.group_id,
        &options.block_hash,
        &options.tx_hash,
    )?;

    if !valid {
        println!("{}", "Spend proof: INVALID".red().bold());
        bail!("Spend proof did not verify");
    }

    println!("{}", "Spend proof: VALID".green().bold());
    println!(
        "  {} coin(s) of {} in the anonymity set",
        options.anonymity_set.len(),
        options.denomination
    );
    Ok(())
}
