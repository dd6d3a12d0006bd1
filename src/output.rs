//! TSV and JSON rendering for command results.
//!
//! TSV rows carry full base58 addresses so they can be piped straight into
//! other tools; JSON mode emits one document per command.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use transmuter::types::vault_label;
use transmuter::{
    BankAvailability, BankId, ExecutionStep, MutationConfig, TokenMatch, WhitelistEntry,
};

use crate::error::Result;

fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, fields: &[&str]) -> Result<()> {
    writeln!(writer, "{}", fields.join("\t"))?;
    Ok(())
}

/// name, vault \t kind \t address \t amount, then price, duration, usage.
pub fn write_mutation<W: Write>(writer: &mut W, config: &MutationConfig, json: bool) -> Result<()> {
    if json {
        return write_json(writer, config);
    }

    write_line(writer, &["name", &config.name])?;
    for (i, taker) in config.takers.iter().enumerate() {
        let label = format!("taker {}", vault_label(i));
        write_line(
            writer,
            &[&label, "bank", &taker.bank.to_string(), &taker.required_amount.to_string()],
        )?;
    }
    for (i, maker) in config.makers.iter().enumerate() {
        let label = format!("maker {}", vault_label(i));
        write_line(
            writer,
            &[&label, "mint", &maker.mint.to_string(), &maker.amount_per_use.to_string()],
        )?;
    }

    write_line(writer, &["price", "sol", &config.price_sol().to_string()])?;
    write_line(writer, &["reversible", &config.reversible.to_string()])?;
    if config.reversible {
        write_line(writer, &["reversal", "sol", &config.reversal_price_sol().to_string()])?;
    }
    write_line(writer, &["duration", "sec", &config.duration_sec.to_string()])?;
    write_line(
        writer,
        &[
            "uses",
            &config.times_used().to_string(),
            &config.total_uses.to_string(),
        ],
    )
}

/// bank \t kind \t address
pub fn write_whitelists<W: Write>(
    writer: &mut W,
    whitelists: &BTreeMap<BankId, Vec<WhitelistEntry>>,
    json: bool,
) -> Result<()> {
    if json {
        return write_json(writer, whitelists);
    }

    for (bank, entries) in whitelists {
        if entries.is_empty() {
            write_line(writer, &[&bank.to_string(), "-", "any"])?;
            continue;
        }
        for entry in entries {
            write_line(
                writer,
                &[&bank.to_string(), &entry.kind.to_string(), &entry.address.to_string()],
            )?;
        }
    }
    Ok(())
}

/// bank \t mint \t match \t sufficient
///
/// Banks with nothing selectable print a single `free-text` row.
pub fn write_availability<W: Write>(
    writer: &mut W,
    availability: &BTreeMap<BankId, BankAvailability>,
    json: bool,
) -> Result<()> {
    if json {
        return write_json(writer, availability);
    }

    for (bank, record) in availability {
        let bank = bank.to_string();
        if record.is_free_text() {
            write_line(writer, &[&bank, "-", "free-text", "-"])?;
            continue;
        }
        for (mint, a) in &record.mints {
            let matched = match a.matched {
                TokenMatch::Mint => "mint".to_string(),
                TokenMatch::Creator { creator } => format!("creator:{creator}"),
            };
            write_line(
                writer,
                &[
                    &bank,
                    &mint.to_string(),
                    &matched,
                    if a.has_sufficient_balance { "yes" } else { "no" },
                ],
            )?;
        }
    }
    Ok(())
}

/// step# \t step \t bank \t mint \t amount
pub fn write_plan<W: Write>(writer: &mut W, steps: &[ExecutionStep], json: bool) -> Result<()> {
    if json {
        return write_json(writer, steps);
    }

    for (i, step) in steps.iter().enumerate() {
        let n = (i + 1).to_string();
        match step {
            ExecutionStep::InitTakerVaults { banks } => {
                let banks: Vec<String> = banks.iter().map(ToString::to_string).collect();
                write_line(writer, &[&n, "init-vaults", &banks.join(","), "-", "-"])?;
            }
            ExecutionStep::Deposit { bank, mint, amount } => write_line(
                writer,
                &[
                    &n,
                    "deposit",
                    &bank.to_string(),
                    &mint.to_string(),
                    &amount.to_string(),
                ],
            )?,
            ExecutionStep::Execute => write_line(writer, &[&n, "execute", "-", "-", "-"])?,
        }
    }
    Ok(())
}
