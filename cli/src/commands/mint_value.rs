//! Split an amount into denominations and derive one coin per denomination

use anyhow::Result;
use colored::Colorize;
use sigma::{plan_mints, MasterKey, ProtocolVersion};

use super::format_amount;

pub fn run(amount: i64, master: &MasterKey, last_index: u32, version: ProtocolVersion, json: bool) -> Result<()> {
    let plan = plan_mints(amount, master, last_index, version)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!();
    println!("{}", "Sigma Mint Plan".yellow().bold());
    println!();
    for mint in &plan.mints {
        println!(
            "  {:>5} coin(s)  index {:<10} {}",
            mint.denomination.to_string().green(),
            mint.index,
            mint.commitment
        );
    }
    if plan.mints.is_empty() {
        println!("  {}", "Nothing to mint".dimmed());
    }
    println!();
    println!("  Minted:    {}", format_amount(plan.minted_value()));
    if plan.remainder > 0 {
        println!("  Remainder: {} {}", format_amount(plan.remainder), "(below smallest denomination)".dimmed());
    }
    if let Some(last) = plan.last_index() {
        println!("  Next free index: {}", last.saturating_add(1));
    }
    println!();

    Ok(())
}
