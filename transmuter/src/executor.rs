//! Selection validation and sequenced mutation execution.
//!
//! [`plan_execution`] turns a mutation config plus the user's token choices
//! into an ordered list of steps, refusing up front when a required bank has
//! no choice. [`MutationExecutor::execute`] walks that plan: one combined
//! transaction creating every taker vault, one deposit per funded bank, then
//! the mutation's execute call. The first failure stops the sequence; steps
//! that already landed on-chain are not undone.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::clients::{AccountFetcher, DepositRequest, MutationClient, TransactionSender, VaultClient};
use crate::error::{Result, TransmuterError};
use crate::types::{Address, MutationConfig, PendingTransaction, Selections, Signature};

/// One on-chain step of a mutation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ExecutionStep {
    /// Create (or resolve) the taker vault of every bank, in one transaction.
    InitTakerVaults { banks: Vec<Address> },
    /// Move `amount` of `mint` from the wallet into the bank's taker vault.
    Deposit {
        bank: Address,
        mint: Address,
        amount: u64,
    },
    /// Invoke the mutation.
    Execute,
}

/// Validate `selections` against `config` and lay out the steps to run.
///
/// # Errors
///
/// Returns [`TransmuterError::MissingSelection`] for the first bank with a
/// non-zero requirement and no selection, or [`TransmuterError::Validation`]
/// if the config itself is malformed.
pub fn plan_execution(config: &MutationConfig, selections: &Selections) -> Result<Vec<ExecutionStep>> {
    config.validate()?;

    for taker in config.required_takers() {
        if selections.get(&taker.bank).is_none() {
            return Err(TransmuterError::MissingSelection { bank: taker.bank });
        }
    }

    let mut steps = Vec::with_capacity(config.takers.len() + 2);
    if !config.takers.is_empty() {
        steps.push(ExecutionStep::InitTakerVaults {
            banks: config.taker_banks(),
        });
    }
    for taker in config.required_takers() {
        if let Some(choice) = selections.get(&taker.bank) {
            steps.push(ExecutionStep::Deposit {
                bank: taker.bank,
                mint: choice.mint,
                amount: taker.required_amount,
            });
        }
    }
    steps.push(ExecutionStep::Execute);

    Ok(steps)
}

/// A deposit that was confirmed on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    pub bank: Address,
    pub vault: Address,
    pub mint: Address,
    pub source: Address,
    pub amount: u64,
    pub signature: Signature,
}

/// Signatures of everything a successful run submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    /// `None` when every taker vault already existed.
    pub vault_init: Option<Signature>,
    /// Taker vault per bank.
    pub vaults: BTreeMap<Address, Address>,
    pub deposits: Vec<DepositReceipt>,
    pub execute: Signature,
}

/// Runs a mutation for `owner` through explicitly supplied clients.
pub struct MutationExecutor<'a, A, V, M, S> {
    accounts: &'a A,
    vaults: &'a V,
    mutation: &'a M,
    sender: &'a S,
    owner: Address,
}

impl<'a, A, V, M, S> MutationExecutor<'a, A, V, M, S>
where
    A: AccountFetcher,
    V: VaultClient,
    M: MutationClient,
    S: TransactionSender,
{
    pub fn new(accounts: &'a A, vaults: &'a V, mutation: &'a M, sender: &'a S, owner: Address) -> Self {
        Self {
            accounts,
            vaults,
            mutation,
            sender,
            owner,
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Validate the selections and run the full mutation sequence.
    ///
    /// Nothing is submitted if a required selection is missing.
    pub async fn execute(
        &self,
        config: &MutationConfig,
        selections: &Selections,
    ) -> Result<ExecutionReport> {
        let plan = plan_execution(config, selections)?;
        info!(owner = %self.owner.short(), steps = plan.len(), "executing mutation");

        let mut vault_init = None;
        let mut vaults = BTreeMap::new();
        let mut deposits = Vec::new();
        let mut execute = None;

        for step in &plan {
            match step {
                ExecutionStep::InitTakerVaults { banks } => {
                    vault_init = self.init_taker_vaults(banks, &mut vaults).await?;
                }
                ExecutionStep::Deposit { bank, mint, amount } => {
                    let vault = vaults.get(bank).copied().ok_or_else(|| {
                        TransmuterError::Validation(format!("no taker vault resolved for bank {bank}"))
                    })?;
                    deposits.push(self.deposit(*bank, vault, *mint, *amount).await?);
                }
                ExecutionStep::Execute => {
                    let tx = self
                        .mutation
                        .execute(&self.owner)
                        .await
                        .map_err(|e| e.into_transaction("build execute"))?;
                    let signature = self.submit("execute mutation", &tx).await?;
                    info!(%signature, "mutation executed");
                    execute = Some(signature);
                }
            }
        }

        let execute = execute.ok_or_else(|| {
            TransmuterError::Validation("execution plan has no execute step".into())
        })?;

        Ok(ExecutionReport {
            vault_init,
            vaults,
            deposits,
            execute,
        })
    }

    async fn init_taker_vaults(
        &self,
        banks: &[Address],
        vaults: &mut BTreeMap<Address, Address>,
    ) -> Result<Option<Signature>> {
        let mut combined = PendingTransaction::default();
        for bank in banks {
            let taker = self
                .vaults
                .init_taker_vault(bank, &self.owner)
                .await
                .map_err(|e| e.into_transaction("build taker vault"))?;
            debug!(bank = %bank.short(), vault = %taker.vault.short(), new = !taker.tx.is_empty(), "taker vault resolved");
            vaults.insert(*bank, taker.vault);
            combined = combined.combine(taker.tx);
        }

        if combined.is_empty() {
            info!("taker vaults already initialized");
            return Ok(None);
        }

        let signature = self.submit("init taker vaults", &combined).await?;
        info!(%signature, vaults = banks.len(), "taker vaults initialized");
        Ok(Some(signature))
    }

    async fn deposit(
        &self,
        bank: Address,
        vault: Address,
        mint: Address,
        amount: u64,
    ) -> Result<DepositReceipt> {
        let source = self.funding_source(&bank, &mint, amount).await?;
        let request = DepositRequest {
            bank,
            vault,
            owner: self.owner,
            amount,
            mint,
            source,
        };
        let tx = self
            .vaults
            .deposit(&request)
            .await
            .map_err(|e| e.into_transaction("build deposit"))?;
        let signature = self.submit("deposit", &tx).await?;
        info!(bank = %bank.short(), mint = %mint.short(), amount, %signature, "deposit confirmed");

        Ok(DepositReceipt {
            bank,
            vault,
            mint,
            source,
            amount,
            signature,
        })
    }

    /// First wallet token account holding at least `amount` of `mint`.
    async fn funding_source(&self, bank: &Address, mint: &Address, amount: u64) -> Result<Address> {
        let accounts = self
            .accounts
            .token_accounts_by_mint(&self.owner, mint)
            .await
            .map_err(|e| e.into_transaction("resolve funding source"))?;
        accounts
            .iter()
            .find(|a| &a.mint == mint && a.amount >= amount)
            .map(|a| a.account)
            .ok_or(TransmuterError::NoFundingSource {
                bank: *bank,
                mint: *mint,
            })
    }

    async fn submit(&self, step: &str, tx: &PendingTransaction) -> Result<Signature> {
        debug!(step, instructions = tx.len(), "submitting transaction");
        self.sender
            .send_and_confirm(tx)
            .await
            .map_err(|e| e.into_transaction(step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TakerRequirement, TokenChoice, ChoiceOrigin};

    fn addr(b: u8) -> Address {
        Address::new([b; 32])
    }

    fn config(amounts: &[u64]) -> MutationConfig {
        MutationConfig {
            name: "forge".into(),
            takers: amounts
                .iter()
                .enumerate()
                .map(|(i, &required_amount)| TakerRequirement {
                    bank: addr(i as u8 + 1),
                    required_amount,
                })
                .collect(),
            makers: vec![],
            price: Default::default(),
            reversible: false,
            duration_sec: 0,
            total_uses: 1,
            remaining_uses: 1,
        }
    }

    fn choice(mint: u8) -> TokenChoice {
        TokenChoice {
            mint: addr(mint),
            origin: ChoiceOrigin::FreeText,
        }
    }

    #[test]
    fn test_plan_missing_third_selection() {
        let cfg = config(&[1, 1, 1]);
        let sel: Selections = [(addr(1), choice(10)), (addr(2), choice(11))]
            .into_iter()
            .collect();
        let err = plan_execution(&cfg, &sel).unwrap_err();
        match err {
            TransmuterError::MissingSelection { bank } => assert_eq!(bank, addr(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plan_skips_zero_amount_deposit() {
        let cfg = config(&[2, 0, 1]);
        let sel: Selections = [(addr(1), choice(10)), (addr(2), choice(11)), (addr(3), choice(12))]
            .into_iter()
            .collect();
        let plan = plan_execution(&cfg, &sel).unwrap();
        assert_eq!(
            plan,
            vec![
                ExecutionStep::InitTakerVaults {
                    banks: vec![addr(1), addr(2), addr(3)]
                },
                ExecutionStep::Deposit {
                    bank: addr(1),
                    mint: addr(10),
                    amount: 2
                },
                ExecutionStep::Deposit {
                    bank: addr(3),
                    mint: addr(12),
                    amount: 1
                },
                ExecutionStep::Execute,
            ]
        );
    }

    #[test]
    fn test_plan_zero_amount_needs_no_selection() {
        let cfg = config(&[1, 0]);
        let sel: Selections = [(addr(1), choice(10))].into_iter().collect();
        let plan = plan_execution(&cfg, &sel).unwrap();
        assert_eq!(plan.len(), 3);
    }
}
