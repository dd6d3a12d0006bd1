//! Whitelist-aware token availability.
//!
//! For every bank, works out which whitelisted token types the wallet holds.
//! `mint` entries are answered from the owned-accounts snapshot; `creator`
//! entries resolve each owned mint's minting authority and, on a match,
//! re-read the wallet's holdings of that exact mint before declaring it
//! usable.
//!
//! Banks, entries, and per-mint lookups run strictly one after another, and
//! the first failed lookup aborts the whole aggregation.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::clients::{AccountFetcher, WhitelistSource};
use crate::error::{Result, TransmuterError};
use crate::types::{
    total_held, Address, Availability, BankAvailability, BankId, OwnedTokenAccount,
    WhitelistEntry, WhitelistKind,
};

/// Fetch the whitelist of every bank in `banks`, one bank at a time.
pub async fn fetch_whitelists<W: WhitelistSource>(
    source: &W,
    banks: &[BankId],
) -> Result<BTreeMap<BankId, Vec<WhitelistEntry>>> {
    let mut whitelists = BTreeMap::new();
    for bank in banks {
        let entries = source
            .fetch_whitelist(bank)
            .await
            .map_err(TransmuterError::into_lookup)?;
        debug!(bank = %bank.short(), entries = entries.len(), "whitelist loaded");
        whitelists.insert(*bank, entries);
    }
    Ok(whitelists)
}

/// Snapshot the wallet's token accounts, then compute availability per bank.
pub async fn load_availability<F: AccountFetcher>(
    fetcher: &F,
    owner: &Address,
    banks: &BTreeMap<BankId, Vec<WhitelistEntry>>,
) -> Result<BTreeMap<BankId, BankAvailability>> {
    let owned = fetcher
        .token_accounts_by_owner(owner)
        .await
        .map_err(TransmuterError::into_lookup)?;
    info!(owner = %owner.short(), accounts = owned.len(), "token accounts loaded");
    compute_availability(fetcher, owner, banks, &owned).await
}

/// Compute availability for each bank from an owned-accounts snapshot.
///
/// Every `mint` entry yields exactly one record. A `creator` entry yields one
/// record per distinct owned mint whose authority is the creator. Banks with
/// no whitelist get an empty record.
pub async fn compute_availability<F: AccountFetcher>(
    fetcher: &F,
    owner: &Address,
    banks: &BTreeMap<BankId, Vec<WhitelistEntry>>,
    owned: &[OwnedTokenAccount],
) -> Result<BTreeMap<BankId, BankAvailability>> {
    let mut result = BTreeMap::new();

    for (bank, entries) in banks {
        let record = bank_availability(fetcher, owner, entries, owned)
            .await
            .map_err(TransmuterError::into_lookup)?;
        debug!(
            bank = %bank.short(),
            whitelist = entries.len(),
            candidates = record.mints.len(),
            sufficient = record.sufficient().count(),
            "bank availability computed"
        );
        result.insert(*bank, record);
    }

    Ok(result)
}

async fn bank_availability<F: AccountFetcher>(
    fetcher: &F,
    owner: &Address,
    entries: &[WhitelistEntry],
    owned: &[OwnedTokenAccount],
) -> Result<BankAvailability> {
    let mut record = BankAvailability::new(entries.len());

    for entry in entries {
        match entry.kind {
            WhitelistKind::Mint => {
                let held = total_held(owned, &entry.address) > 0;
                record.record(entry.address, Availability::mint(held));
            }
            WhitelistKind::Creator => {
                for (mint, availability) in
                    creator_matches(fetcher, owner, &entry.address, owned).await?
                {
                    record.record(mint, availability);
                }
            }
        }
    }

    Ok(record)
}

/// Owned mints minted by `creator`, each checked against a fresh balance read.
async fn creator_matches<F: AccountFetcher>(
    fetcher: &F,
    owner: &Address,
    creator: &Address,
    owned: &[OwnedTokenAccount],
) -> Result<Vec<(Address, Availability)>> {
    let mut matched = Vec::new();
    for mint in distinct_mints(owned) {
        let authority = fetcher.mint_authority(&mint).await?;
        if authority.as_ref() == Some(creator) {
            matched.push(mint);
        }
    }

    let mut records = Vec::with_capacity(matched.len());
    for mint in matched {
        let fresh = fetcher.token_accounts_by_mint(owner, &mint).await?;
        let held = total_held(&fresh, &mint);
        debug!(mint = %mint.short(), creator = %creator.short(), held, "creator match");
        records.push((mint, Availability::creator(held > 0, *creator)));
    }

    Ok(records)
}

/// Mints with a non-zero balance, in first-seen order, without repeats.
fn distinct_mints(owned: &[OwnedTokenAccount]) -> Vec<Address> {
    let mut mints: Vec<Address> = Vec::with_capacity(owned.len());
    for account in owned.iter().filter(|a| a.holds_any()) {
        if !mints.contains(&account.mint) {
            mints.push(account.mint);
        }
    }
    mints
}
