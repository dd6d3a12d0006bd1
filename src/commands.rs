use std::collections::BTreeMap;
use std::io::Write;

use tracing::info;
use transmuter::{
    fetch_whitelists, load_availability, plan_execution, Address, BankAvailability, BankId,
    ClientConfig, GemBankWhitelist, MutationConfig, MutationSource, RpcClient, TransmuterReader,
};

use crate::cli::{
    AvailabilityArgs, Cli, Command, MutationSourceArgs, PlanArgs, ShowArgs, WhitelistArgs,
};
use crate::error::{CliError, Result};
use crate::{manifest, output};

/// Build the RPC settings from global flags.
pub fn client_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig {
        commitment: cli.commitment.clone(),
        ..Default::default()
    };
    if let Some(url) = &cli.rpc_url {
        config.rpc_url = url.clone();
    }
    if let Some(program) = cli.gem_bank_program {
        config.gem_bank_program = program;
    }
    config.validate()?;
    Ok(config)
}

pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    match &cli.command {
        Command::Show(args) => show(cli, args, out).await,
        Command::Whitelist(args) => whitelist(cli, args, out).await,
        Command::Availability(args) => availability(cli, args, out).await,
        Command::Plan(args) => plan(cli, args, out).await,
    }
}

/// Mutation rules from the manifest file, or from the mutation account on-chain.
async fn load_mutation(cli: &Cli, source: &MutationSourceArgs) -> Result<MutationConfig> {
    match (&source.manifest, source.mutation) {
        (Some(path), _) => manifest::load_mutation(path),
        (None, Some(address)) => {
            let reader = TransmuterReader::new(RpcClient::new(&client_config(cli)?));
            let mutation = reader.fetch_mutation(&address).await?;
            info!(mutation = %address.short(), takers = mutation.takers.len(), "mutation loaded from chain");
            Ok(mutation)
        }
        (None, None) => Err(CliError::MissingMutation),
    }
}

async fn show<W: Write>(cli: &Cli, args: &ShowArgs, out: &mut W) -> Result<()> {
    let config = load_mutation(cli, &args.source).await?;
    output::write_mutation(out, &config, cli.json)
}

async fn whitelist<W: Write>(cli: &Cli, args: &WhitelistArgs, out: &mut W) -> Result<()> {
    let config = client_config(cli)?;
    let source = GemBankWhitelist::new(RpcClient::new(&config), config.gem_bank_program);
    let whitelists = fetch_whitelists(&source, &args.banks).await?;
    output::write_whitelists(out, &whitelists, cli.json)
}

async fn availability<W: Write>(cli: &Cli, args: &AvailabilityArgs, out: &mut W) -> Result<()> {
    let owner = args.owner.ok_or(CliError::MissingOwner)?;
    let mutation = load_mutation(cli, &args.source).await?;
    let config = client_config(cli)?;

    let availability = wallet_availability(&config, &owner, &mutation.taker_banks()).await?;
    output::write_availability(out, &availability, cli.json)
}

async fn plan<W: Write>(cli: &Cli, args: &PlanArgs, out: &mut W) -> Result<()> {
    let mutation = load_mutation(cli, &args.source).await?;
    let mut selections = manifest::load_selections(&args.selections)?;

    if args.check {
        let owner = args.owner.ok_or(CliError::MissingOwner)?;
        let config = client_config(cli)?;
        let availability = wallet_availability(&config, &owner, &mutation.taker_banks()).await?;
        selections = manifest::reconcile(&selections, &availability);
    }

    let steps = plan_execution(&mutation, &selections)?;
    info!(steps = steps.len(), selections = selections.len(), "execution planned");
    output::write_plan(out, &steps, cli.json)
}

async fn wallet_availability(
    config: &ClientConfig,
    owner: &Address,
    banks: &[BankId],
) -> Result<BTreeMap<BankId, BankAvailability>> {
    let rpc = RpcClient::new(config);
    let source = GemBankWhitelist::new(rpc.clone(), config.gem_bank_program);
    let whitelists = fetch_whitelists(&source, banks).await?;
    Ok(load_availability(&rpc, owner, &whitelists).await?)
}
