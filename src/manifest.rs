use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};
use transmuter::{Address, BankAvailability, BankId, MutationConfig, Selections, TokenChoice};

use crate::error::{CliError, Result};

/// Load and validate a mutation manifest.
pub fn load_mutation(path: &Path) -> Result<MutationConfig> {
    let config: MutationConfig = read_json(path)?;
    config.validate()?;
    debug!(
        name = %config.name,
        takers = config.takers.len(),
        makers = config.makers.len(),
        "mutation manifest loaded"
    );
    Ok(config)
}

/// A selections file maps bank addresses to either a bare mint address or a
/// full token choice.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SelectionEntry {
    Mint(Address),
    Choice(TokenChoice),
}

pub fn load_selections(path: &Path) -> Result<Selections> {
    let raw: BTreeMap<Address, SelectionEntry> = read_json(path)?;
    let mut selections = Selections::new();
    for (bank, entry) in raw {
        match entry {
            SelectionEntry::Mint(mint) => selections.select_free_text(bank, mint),
            SelectionEntry::Choice(choice) => {
                selections.insert(bank, choice);
            }
        }
    }
    Ok(selections)
}

/// Re-derive each choice from live availability.
///
/// Banks with a whitelist only accept mints the wallet can actually supply;
/// other banks take the mint as free text.
pub fn reconcile(
    selections: &Selections,
    availability: &BTreeMap<BankId, BankAvailability>,
) -> Selections {
    let mut out = Selections::new();
    for (bank, choice) in selections.iter() {
        match availability.get(bank) {
            Some(record) if !record.is_free_text() => {
                if !out.select_whitelisted(*bank, choice.mint, record) {
                    warn!(bank = %bank, mint = %choice.mint, "selection dropped: not whitelisted or not held");
                }
            }
            _ => out.select_free_text(*bank, choice.mint),
        }
    }
    out
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}
